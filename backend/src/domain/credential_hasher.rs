//! One-way salted password hashing and constant-time verification.
//!
//! Hashes are Argon2id PHC strings, so the salt and work factor travel with
//! the hash and need no separate storage.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Errors raised while hashing or verifying credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashingError {
    /// The candidate password does not match the stored hash.
    #[error("password does not match")]
    Mismatch,
    /// The stored hash is not a valid PHC string.
    #[error("stored password hash is malformed: {message}")]
    MalformedHash { message: String },
    /// The hasher could not produce a hash (bad parameters, RNG failure).
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
}

/// A password hash in PHC string format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedCredential(String);

impl HashedCredential {
    /// Wrap a PHC string loaded from storage.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// PHC string suitable for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Work-factor parameters for Argon2id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasherParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of iterations.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for HasherParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2id credential hasher.
///
/// Stateless apart from its parameters; safe to share across requests.
///
/// # Examples
/// ```
/// use backend::domain::CredentialHasher;
///
/// let hasher = CredentialHasher::default();
/// let stored = hasher.hash("correct horse").unwrap();
/// assert!(hasher.verify(&stored, "correct horse").is_ok());
/// assert!(hasher.verify(&stored, "battery staple").is_err());
/// ```
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

impl CredentialHasher {
    /// Build a hasher with explicit work-factor parameters.
    pub fn with_params(params: HasherParams) -> Result<Self, HashingError> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|err| HashingError::Hashing {
            message: err.to_string(),
        })?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<HashedCredential, HashingError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| HashedCredential(hash.to_string()))
            .map_err(|err| HashingError::Hashing {
                message: err.to_string(),
            })
    }

    /// Verify `candidate` against a stored hash.
    ///
    /// The parameters embedded in the stored hash are honoured, so hashes
    /// produced under an older work factor still verify.
    pub fn verify(&self, stored: &HashedCredential, candidate: &str) -> Result<(), HashingError> {
        let parsed = PasswordHash::new(stored.as_str()).map_err(|err| {
            HashingError::MalformedHash {
                message: err.to_string(),
            }
        })?;
        self.argon2
            .verify_password(candidate.as_bytes(), &parsed)
            .map_err(|err| match err {
                argon2::password_hash::Error::Password => HashingError::Mismatch,
                other => HashingError::MalformedHash {
                    message: other.to_string(),
                },
            })
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}
