//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use backend::inbound::http::session_config::{
    BuildMode, SessionConfigError, SessionSettings, session_settings_from_env,
};
use backend::outbound::persistence::{DEFAULT_MAX_SIZE, PoolConfig};
use mockable::Env;

const DATABASE_URL_ENV: &str = "DATABASE_URL";
const BIND_ADDR_ENV: &str = "BIND_ADDR";
const POOL_MAX_SIZE_ENV: &str = "DB_POOL_MAX_SIZE";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while reading application settings.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Session settings were rejected.
    #[error(transparent)]
    Session(#[from] SessionConfigError),
}

/// Settings needed to start the server.
pub struct AppSettings {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) pool: PoolConfig,
    pub(crate) session: SessionSettings,
}

impl AppSettings {
    /// Read settings from the environment.
    ///
    /// `DATABASE_URL` is required. `BIND_ADDR` defaults to `0.0.0.0:8080`
    /// and `DB_POOL_MAX_SIZE` to [`DEFAULT_MAX_SIZE`]. Session settings are
    /// read by [`session_settings_from_env`].
    pub fn from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Self, ConfigError> {
        let database_url = env
            .string(DATABASE_URL_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingEnv {
                name: DATABASE_URL_ENV,
            })?;
        let bind_addr = bind_addr_from_env(env)?;
        let max_size = pool_size_from_env(env)?;
        let session = session_settings_from_env(env, mode)?;

        Ok(Self {
            bind_addr,
            pool: PoolConfig::new(database_url).with_max_size(max_size),
            session,
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

fn bind_addr_from_env<E: Env>(env: &E) -> Result<SocketAddr, ConfigError> {
    let value = env
        .string(BIND_ADDR_ENV)
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
    value.parse().map_err(|_| ConfigError::InvalidEnv {
        name: BIND_ADDR_ENV,
        value,
        expected: "host:port socket address",
    })
}

fn pool_size_from_env<E: Env>(env: &E) -> Result<u32, ConfigError> {
    let Some(value) = env.string(POOL_MAX_SIZE_ENV) else {
        return Ok(DEFAULT_MAX_SIZE);
    };
    match value.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidEnv {
            name: POOL_MAX_SIZE_ENV,
            value,
            expected: "a positive integer",
        }),
    }
}
