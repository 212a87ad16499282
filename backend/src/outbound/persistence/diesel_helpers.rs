//! Shared helpers for Diesel repository implementations.
//!
//! - Deadline enforcement for whole storage operations.
//! - Classification of Diesel errors into the categories repositories map
//!   onto their port errors.

use std::future::Future;
use std::time::Duration;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

/// Deadline applied to every storage operation, checkout included.
pub const OPERATION_DEADLINE: Duration = Duration::from_secs(10);

/// Run `operation` under `deadline`.
///
/// On expiry the in-flight future is dropped, which returns any checked-out
/// connection to the pool, and `on_timeout` builds the repository error.
pub async fn with_deadline<T, E, F, C>(
    deadline: Duration,
    operation: &'static str,
    fut: F,
    on_timeout: C,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    C: FnOnce(String) -> E,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(%operation, deadline_ms = deadline.as_millis(), "storage deadline elapsed");
            Err(on_timeout(format!(
                "{operation} exceeded {}s deadline",
                deadline.as_secs()
            )))
        }
    }
}

/// Storage failure categories shared by the repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DieselFailure {
    /// No row matched.
    NotFound,
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
    /// The connection dropped mid-operation.
    Connection,
    /// Any other query failure.
    Query { message: String },
}

/// Classify a Diesel error and emit debug context.
pub fn classify_diesel_error(error: DieselError, operation: &str) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(%error, %operation, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => DieselFailure::NotFound,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection
        }
        DieselError::QueryBuilderError(_) => DieselFailure::Query {
            message: "database query error".to_owned(),
        },
        _ => DieselFailure::Query {
            message: "database error".to_owned(),
        },
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(String::from("constraint failed")))
    }

    #[rstest]
    #[case(DieselError::NotFound, DieselFailure::NotFound)]
    #[case(
        database_error(DatabaseErrorKind::UniqueViolation),
        DieselFailure::UniqueViolation { constraint: None }
    )]
    #[case(
        database_error(DatabaseErrorKind::ForeignKeyViolation),
        DieselFailure::ForeignKeyViolation { constraint: None }
    )]
    #[case(database_error(DatabaseErrorKind::ClosedConnection), DieselFailure::Connection)]
    #[case(
        database_error(DatabaseErrorKind::CheckViolation),
        DieselFailure::Query { message: "database error".to_owned() }
    )]
    fn diesel_errors_are_classified(#[case] error: DieselError, #[case] expected: DieselFailure) {
        assert_eq!(classify_diesel_error(error, "test"), expected);
    }

    #[tokio::test]
    async fn completed_operations_pass_through() {
        let result: Result<u8, String> =
            with_deadline(Duration::from_secs(1), "fast", async { Ok(7) }, |m| m).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_operations_time_out() {
        let result: Result<u8, String> = with_deadline(
            OPERATION_DEADLINE,
            "slow",
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(1)
            },
            |message| message,
        )
        .await;
        let message = result.expect_err("deadline should elapse");
        assert!(message.contains("slow exceeded 10s deadline"));
    }
}
