//! Shared helpers for integration suites that need embedded PostgreSQL.
//!
//! Integration tests compile as separate crates, so helpers shared between
//! suites live here and are pulled in with `mod support;`.

pub mod embedded_postgres;

/// Environment switch that opts in to the embedded PostgreSQL suites.
pub const RUN_PG_EMBEDDED: &str = "RUN_PG_EMBEDDED";

/// Returns true when `RUN_PG_EMBEDDED=1`.
pub fn embedded_postgres_enabled() -> bool {
    std::env::var(RUN_PG_EMBEDDED).as_deref() == Ok("1")
}

/// Returns true when the `SKIP_TEST_CLUSTER` environment variable is set to a
/// truthy value ("1", "true" or "yes", case-insensitive).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Handles embedded cluster setup failures consistently across suites.
///
/// When `SKIP_TEST_CLUSTER` is truthy, prints a skip marker and returns `None`.
/// Otherwise panics so a broken cluster is not silently ignored.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
