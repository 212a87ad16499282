//! Embedded PostgreSQL provisioning for adapter suites.
//!
//! Each suite gets its own temporary database on the shared cluster with the
//! Diesel migrations applied, so tests never see each other's rows.

use diesel::pg::PgConnection;
use diesel::{Connection, RunQueryDsl, sql_query, sql_types};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};

/// Migrations from the backend/migrations directory.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Returns the process-wide embedded cluster, starting it on first use.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    pg_embedded_setup_unpriv::test_support::shared_cluster_handle()
        .map_err(|err| format!("shared cluster: {err:?}"))
}

/// Creates an empty temporary database and runs every migration against it.
pub fn provision_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let database = cluster
        .temporary_database(format!("test_{}", uuid::Uuid::new_v4().simple()))
        .map_err(|err| format!("create temporary database: {err:?}"))?;
    migrate_schema(database.url())?;
    Ok(database)
}

/// Runs all pending Diesel migrations against `url`.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migration: {err}"))?;
    Ok(())
}

#[derive(diesel::QueryableByName)]
struct InsertedId {
    #[diesel(sql_type = sql_types::Integer)]
    id: i32,
}

/// Inserts a doctor account and returns its user id.
///
/// Patients reference `users(id)`, so every patient row needs one of these.
pub fn seed_doctor(url: &str, email: &str) -> Result<i32, String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    let inserted: InsertedId = sql_query(
        "INSERT INTO users (email, role, password_hash) VALUES ($1, 'doctor', 'unused') \
         RETURNING id",
    )
    .bind::<sql_types::Text, _>(email)
    .get_result(&mut conn)
    .map_err(|err| format!("seed doctor: {err}"))?;
    Ok(inserted.id)
}
