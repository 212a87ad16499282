//! HTTP inbound adapter exposing REST endpoints.

pub mod clinical;
pub mod error;
pub mod front_desk;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

pub use error::ApiResult;
