//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::TokenService;
use crate::domain::ports::{ClinicalPatients, FrontDeskPatients, LoginService};

use super::session_config::CookieSettings;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub front_desk: Arc<dyn FrontDeskPatients>,
    pub clinical: Arc<dyn ClinicalPatients>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub front_desk: Arc<dyn FrontDeskPatients>,
    pub clinical: Arc<dyn ClinicalPatients>,
    /// Issues the token set as the `auth_token` cookie at login.
    pub tokens: Arc<TokenService>,
    pub cookie: CookieSettings,
}

impl HttpState {
    /// Construct state from a ports bundle, the token service and cookie
    /// attributes.
    pub fn new(ports: HttpStatePorts, tokens: Arc<TokenService>, cookie: CookieSettings) -> Self {
        let HttpStatePorts {
            login,
            front_desk,
            clinical,
        } = ports;
        Self {
            login,
            front_desk,
            clinical,
            tokens,
            cookie,
        }
    }
}
