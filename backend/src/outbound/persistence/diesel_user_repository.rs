//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! A single outer-joined read returns the user row together with any doctor
//! and receptionist rows sharing its email; the domain decides which
//! profile to keep.

use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserAccountRecord, UserPersistenceError, UserRepository};
use crate::domain::{HashedCredential, UserId};

use super::diesel_helpers::{
    DieselFailure, OPERATION_DEADLINE, classify_diesel_error, with_deadline,
};
use super::models::{DoctorProfileRow, ReceptionistProfileRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{doctors, receptionists, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
    deadline: Duration,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            deadline: OPERATION_DEADLINE,
        }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    match classify_diesel_error(error, "find_account_by_email") {
        DieselFailure::Connection => UserPersistenceError::connection("database connection error"),
        DieselFailure::Query { message } => UserPersistenceError::query(message),
        other => UserPersistenceError::query(format!("unexpected failure: {other:?}")),
    }
}

type AccountRow = (
    UserRow,
    Option<DoctorProfileRow>,
    Option<ReceptionistProfileRow>,
);

fn row_to_account((user, doctor, receptionist): AccountRow) -> UserAccountRecord {
    UserAccountRecord {
        id: UserId::new(user.id),
        email: user.email,
        role: user.role,
        password_hash: HashedCredential::from_stored(user.password_hash),
        doctor: doctor.map(Into::into),
        receptionist: receptionist.map(Into::into),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccountRecord>, UserPersistenceError> {
        with_deadline(
            self.deadline,
            "find_account_by_email",
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;

                let row: Option<AccountRow> = users::table
                    .left_join(doctors::table.on(doctors::email.eq(users::email)))
                    .left_join(receptionists::table.on(receptionists::email.eq(users::email)))
                    .filter(users::email.eq(email))
                    .select((
                        UserRow::as_select(),
                        Option::<DoctorProfileRow>::as_select(),
                        Option::<ReceptionistProfileRow>::as_select(),
                    ))
                    .first(&mut conn)
                    .await
                    .optional()
                    .map_err(map_diesel_error)?;

                Ok(row.map(row_to_account))
            },
            |message| UserPersistenceError::timeout(message),
        )
        .await
    }
}
