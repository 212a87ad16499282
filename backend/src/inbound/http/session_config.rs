//! Session token and auth cookie configuration.
//!
//! This module centralises the environment-driven settings for the signing
//! key and the `auth_token` cookie so they are validated consistently and can
//! be tested in isolation.

use actix_web::cookie::SameSite;
use mockable::Env;
use std::path::PathBuf;
use tracing::warn;
use zeroize::Zeroize;

use crate::domain::SigningKey;

const SECRET_DEFAULT_PATH: &str = "/var/run/secrets/jwt_secret";
/// Minimum signing secret length accepted by release builds.
pub const SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 32;
const SECRET_FILE_ENV: &str = "JWT_SECRET_FILE";
const SECRET_ENV: &str = "JWT_SECRET";
const COOKIE_SECURE_ENV: &str = "AUTH_COOKIE_SECURE";
const SAMESITE_ENV: &str = "AUTH_COOKIE_SAMESITE";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and fall back to ephemeral secrets.
    Debug,
    /// Release builds require a readable secret of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Attributes applied to the `auth_token` cookie.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CookieSettings {
    /// Whether the cookie is marked `Secure`.
    pub secure: bool,
    /// `SameSite` policy for the cookie.
    pub same_site: SameSite,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secure: false,
            same_site: SameSite::Lax,
        }
    }
}

/// Session settings derived from configuration.
#[derive(Debug)]
pub struct SessionSettings {
    /// Secret used to sign and verify session tokens.
    pub signing_key: SigningKey,
    /// Cookie attributes.
    pub cookie: CookieSettings,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read signing secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configured secret is too short for release builds.
    #[error("signing secret from {origin} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        origin: String,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie in release builds.
    #[error("AUTH_COOKIE_SAMESITE=None requires AUTH_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
}

/// Build session settings from environment variables and build mode.
///
/// The signing secret comes from `JWT_SECRET` when set, otherwise from the
/// file named by `JWT_SECRET_FILE` (default `/var/run/secrets/jwt_secret`).
///
/// # Examples
///
/// ```rust
/// use backend::inbound::http::session_config::{
///     session_settings_from_env, BuildMode,
/// };
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SECRET" => Some("0123456789abcdef0123456789abcdef".to_string()),
///     "AUTH_COOKIE_SECURE" => Some("1".to_string()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Release)?;
/// assert!(settings.cookie.secure);
/// assert_eq!(settings.signing_key.len(), 32);
/// # Ok(())
/// # }
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let secure = cookie_secure_from_env(env, mode)?;
    let same_site = same_site_from_env(env, mode, secure)?;
    let signing_key = signing_key_from_env(env, mode)?;

    Ok(SessionSettings {
        signing_key,
        cookie: CookieSettings { secure, same_site },
    })
}

fn cookie_secure_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SessionConfigError> {
    match env.string(COOKIE_SECURE_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None => {
                if mode.is_debug() {
                    warn!(
                        value = %value,
                        "invalid AUTH_COOKIE_SECURE; defaulting to insecure"
                    );
                    Ok(false)
                } else {
                    Err(SessionConfigError::InvalidEnv {
                        name: COOKIE_SECURE_ENV,
                        value,
                        expected: BOOL_EXPECTED,
                    })
                }
            }
        },
        None => {
            warn!("AUTH_COOKIE_SECURE not set; auth cookie will be sent over plain HTTP");
            Ok(false)
        }
    }
}

fn same_site_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(value) = env.string(SAMESITE_ENV) else {
        return Ok(SameSite::Lax);
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => {
            if !cookie_secure {
                if mode.is_debug() {
                    warn!(
                        "{}",
                        concat!(
                            "AUTH_COOKIE_SAMESITE=None with AUTH_COOKIE_SECURE=0; ",
                            "browsers may reject the cookie"
                        )
                    );
                } else {
                    return Err(SessionConfigError::InsecureSameSiteNone);
                }
            }
            Ok(SameSite::None)
        }
        _ => {
            if mode.is_debug() {
                warn!(value = %value, "invalid AUTH_COOKIE_SAMESITE, using Lax");
                return Ok(SameSite::Lax);
            }
            Err(SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            })
        }
    }
}

fn signing_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SigningKey, SessionConfigError> {
    if let Some(secret) = env.string(SECRET_ENV).filter(|value| !value.is_empty()) {
        return checked_secret(secret.into_bytes(), SECRET_ENV.to_owned(), mode);
    }

    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| SECRET_DEFAULT_PATH.to_string()),
    );
    match std::fs::read(&path) {
        Ok(bytes) => checked_secret(trim_trailing_newline(bytes), path.display().to_string(), mode),
        Err(error) => {
            if mode.is_debug() {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary signing secret (dev only)"
                );
                Ok(ephemeral_key())
            } else {
                Err(SessionConfigError::SecretRead {
                    path,
                    source: error,
                })
            }
        }
    }
}

fn checked_secret(
    mut bytes: Vec<u8>,
    origin: String,
    mode: BuildMode,
) -> Result<SigningKey, SessionConfigError> {
    let length = bytes.len();
    if length >= SECRET_MIN_LEN {
        return Ok(SigningKey::new(bytes));
    }
    if mode.is_debug() {
        warn!(%origin, length, min_len = SECRET_MIN_LEN, "signing secret is short");
        return Ok(SigningKey::new(bytes));
    }
    bytes.zeroize();
    Err(SessionConfigError::SecretTooShort {
        origin,
        length,
        min_len: SECRET_MIN_LEN,
    })
}

fn trim_trailing_newline(mut bytes: Vec<u8>) -> Vec<u8> {
    while matches!(bytes.last(), Some(b'\n' | b'\r')) {
        bytes.pop();
    }
    bytes
}

fn ephemeral_key() -> SigningKey {
    let secret: [u8; EPHEMERAL_SECRET_LEN] = rand::random();
    SigningKey::new(secret.to_vec())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
