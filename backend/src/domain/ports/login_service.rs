//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call this port to check credentials without importing
//! persistence or hashing details, so HTTP handler tests can substitute a
//! test double.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, LoginCredentials};

/// Domain use-case port for authentication.
///
/// Implementations must not reveal whether the email exists: an unknown
/// account and a wrong password produce the same `unauthorized` error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the user with their role profile.
    async fn authenticate(&self, credentials: &LoginCredentials)
    -> Result<AuthenticatedUser, Error>;
}
