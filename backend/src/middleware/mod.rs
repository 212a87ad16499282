//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! tracing and authentication.

pub mod auth_gate;
pub mod trace;

pub use auth_gate::{AuthenticatedPrincipal, RequireRole, RequireSession};
pub use trace::Trace;
