//! Port abstraction for user account lookups and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{HashedCredential, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The lookup exceeded its deadline.
        Timeout { message: String } => "user repository timed out: {message}",
    }
}

/// Doctor columns joined onto a user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorProfileFields {
    pub name: String,
    pub specialty: String,
    pub emergency_contact: String,
    pub license_number: String,
    pub experience_years: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Receptionist columns joined onto a user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceptionistProfileFields {
    pub name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user row together with whichever profile rows share its email.
///
/// Both bags are optional because the lookup is an outer join; the role
/// decides which one is meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccountRecord {
    pub id: UserId,
    pub email: String,
    /// Role discriminant exactly as stored.
    pub role: String,
    pub password_hash: HashedCredential,
    pub doctor: Option<DoctorProfileFields>,
    pub receptionist: Option<ReceptionistProfileFields>,
}

/// Port for reading user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch the account registered under `email`, with its profile bags.
    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccountRecord>, UserPersistenceError>;
}
