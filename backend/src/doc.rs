//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: login/logout, the receptionist and doctor scopes, and health
//! - **Schemas**: the shared error payload, staff profiles and patient views
//! - **Security**: the `auth_token` cookie scheme
//!
//! The generated specification is served by Swagger UI in debug builds.

use crate::domain::{
    DoctorProfile, Error, ErrorCode, PatientClinicalView, PatientRecord, ReceptionistProfile,
    StaffProfile,
};
use crate::inbound::http::clinical::ClinicalUpdateRequest;
use crate::inbound::http::front_desk::{CreatedPatient, PatientRequest};
use crate::inbound::http::users::LoginRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the auth cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "AuthCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "auth_token",
                "Session token cookie issued by POST /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Clinic backend API",
        description = "Front-desk and clinical patient management behind cookie sessions."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("AuthCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::front_desk::register_patient,
        crate::inbound::http::front_desk::find_patient,
        crate::inbound::http::front_desk::update_patient,
        crate::inbound::http::front_desk::delete_patient,
        crate::inbound::http::clinical::my_patients,
        crate::inbound::http::clinical::update_clinical,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        StaffProfile,
        DoctorProfile,
        ReceptionistProfile,
        PatientRequest,
        CreatedPatient,
        PatientRecord,
        PatientClinicalView,
        ClinicalUpdateRequest,
    )),
    tags(
        (name = "auth", description = "Login and logout"),
        (name = "receptionist", description = "Front-desk patient management"),
        (name = "doctor", description = "Clinical views and updates"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
