//! Backend entry-point: reads settings, connects to PostgreSQL and serves the
//! REST API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), forbid(clippy::expect_used))]

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultClock, DefaultEnv};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::TokenService;
use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::BuildMode;
use backend::outbound::persistence::DbPool;
use server::{AppSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|e| std::io::Error::other(format!("invalid configuration: {e}")))?;

    let pool = DbPool::new(settings.pool.clone())
        .await
        .map_err(|e| std::io::Error::other(format!("database pool: {e}")))?;

    let tokens = Arc::new(TokenService::new(
        &settings.session.signing_key,
        Arc::new(DefaultClock),
    ));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), &settings, pool, tokens)?;
    info!(bind_addr = %settings.bind_addr(), "server listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result
}
