//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, ConfigError};

use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::{Role, TokenService};
use backend::inbound::http::clinical::{my_patients, update_clinical};
use backend::inbound::http::error::{json_error_handler, path_error_handler};
use backend::inbound::http::front_desk::{
    delete_patient, find_patient, register_patient, update_patient,
};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::users::{login, logout};
use backend::middleware::{RequireRole, RequireSession};
use backend::outbound::persistence::DbPool;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    tokens: Arc<TokenService>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        tokens,
    } = deps;

    let receptionist = web::scope("/receptionist")
        .wrap(RequireRole::new(Role::Receptionist))
        .wrap(RequireSession::new(tokens.clone()))
        .service(register_patient)
        .service(find_patient)
        .service(update_patient)
        .service(delete_patient);

    let doctor = web::scope("/doctor")
        .wrap(RequireRole::new(Role::Doctor))
        .wrap(RequireSession::new(tokens))
        .service(my_patients)
        .service(update_clinical);

    let api = web::scope("/api")
        .service(login)
        .service(logout)
        .service(receptionist)
        .service(doctor);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server over `pool` using the provided settings.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `settings`: bind address and cookie attributes.
/// - `pool`: connection pool shared by every persistence adapter.
/// - `tokens`: issues and verifies the `auth_token` cookie.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    settings: &AppSettings,
    pool: DbPool,
    tokens: Arc<TokenService>,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(
        &pool,
        tokens.clone(),
        settings.session.cookie,
    ));

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            tokens: tokens.clone(),
        })
    })
    .bind(settings.bind_addr())?
    .run();

    health_state.mark_ready();
    Ok(server)
}
