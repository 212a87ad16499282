//! Login and logout handlers.
//!
//! ```text
//! POST /api/login {"email":"desk@clinic.test","password":"secret"}
//! POST /api/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{Error, LoginCredentials, LoginValidationError, StaffProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{cleared_cookie, cookie_for};
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/login`.
///
/// Example JSON:
/// `{"email":"desk@clinic.test","password":"secret"}`
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "desk@clinic.test")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Authenticate a staff member and set the `auth_token` cookie.
///
/// The body is the profile matching the account's role. Unknown emails and
/// wrong passwords produce the same `401` response.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = StaffProfile,
            headers(("Set-Cookie" = String, description = "auth_token session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Storage unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user = state.login.authenticate(&credentials).await?;
    let principal = user.principal();
    let token = state
        .tokens
        .issue(&principal)
        .map_err(|err| Error::internal(format!("failed to issue session token: {err}")))?;
    info!(
        user_id = principal.user_id().get(),
        role = principal.role().as_str(),
        "login succeeded"
    );
    Ok(HttpResponse::Ok()
        .cookie(cookie_for(&token, state.cookie))
        .json(user.into_profile()))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Clear the `auth_token` cookie.
///
/// Only the client copy is removed; a captured token stays valid until it
/// expires.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Cookie cleared")
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(cleared_cookie(state.cookie))
        .json(json!({ "message": "logged out" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockLoginService;
    use crate::domain::{AuthenticatedUser, ReceptionistProfile, UserId};
    use crate::inbound::http::session::AUTH_COOKIE_NAME;
    use crate::inbound::http::test_utils::{TestPorts, test_state, test_tokens};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::Value;

    #[derive(Debug)]
    struct ValidationExpectation<'a> {
        message: &'a str,
        field: &'a str,
        code: &'a str,
    }

    fn receptionist() -> AuthenticatedUser {
        let at = Utc
            .with_ymd_and_hms(2025, 1, 2, 3, 4, 5)
            .single()
            .expect("valid timestamp");
        AuthenticatedUser::new(StaffProfile::Receptionist(ReceptionistProfile {
            id: UserId::new(3),
            name: "Anil Kumar".into(),
            email: "desk@clinic.test".into(),
            phone: "555-0100".into(),
            created_at: at,
            updated_at: at,
        }))
    }

    fn test_app(
        login_port: MockLoginService,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = test_state(
            TestPorts {
                login: Some(login_port),
                ..TestPorts::default()
            },
            test_tokens(),
        );
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api").service(login).service(logout))
    }

    fn login_request(email: &str, password: &str) -> actix_web::test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/api/login")
            .set_json(&LoginRequest {
                email: email.into(),
                password: password.into(),
            })
    }

    #[rstest]
    #[case(
        "   ",
        "password",
        ValidationExpectation {
            message: "email must not be empty",
            field: "email",
            code: "empty_email",
        }
    )]
    #[case(
        "desk@clinic.test",
        "",
        ValidationExpectation {
            message: "password must not be empty",
            field: "password",
            code: "empty_password",
        }
    )]
    #[actix_web::test]
    async fn login_rejects_blank_fields(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: ValidationExpectation<'_>,
    ) {
        let mut login_port = MockLoginService::new();
        login_port.expect_authenticate().times(0);
        let app = actix_test::init_service(test_app(login_port)).await;

        let response =
            actix_test::call_service(&app, login_request(email, password).to_request()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["message"].as_str(), Some(expected.message));
        assert_eq!(value["code"].as_str(), Some("invalid_request"));
        assert_eq!(value["details"]["field"].as_str(), Some(expected.field));
        assert_eq!(value["details"]["code"].as_str(), Some(expected.code));
    }

    #[actix_web::test]
    async fn login_failure_returns_no_profile_and_no_cookie() {
        let mut login_port = MockLoginService::new();
        login_port
            .expect_authenticate()
            .times(1)
            .returning(|_| Err(Error::unauthorized("invalid credentials")));
        let app = actix_test::init_service(test_app(login_port)).await;

        let response = actix_test::call_service(
            &app,
            login_request("desk@clinic.test", "wrong").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(
            response
                .response()
                .cookies()
                .all(|c| c.name() != AUTH_COOKIE_NAME)
        );
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["code"].as_str(), Some("unauthorized"));
        assert!(value.get("email").is_none());
    }

    #[actix_web::test]
    async fn login_success_sets_cookie_and_returns_profile() {
        let mut login_port = MockLoginService::new();
        login_port
            .expect_authenticate()
            .withf(|credentials| credentials.email() == "desk@clinic.test")
            .times(1)
            .returning(|_| Ok(receptionist()));
        let app = actix_test::init_service(test_app(login_port)).await;

        let response = actix_test::call_service(
            &app,
            login_request(" desk@clinic.test ", "secret").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .response()
            .cookies()
            .find(|c| c.name() == AUTH_COOKIE_NAME)
            .expect("auth cookie");
        assert_eq!(cookie.http_only(), Some(true));
        assert!(!cookie.value().is_empty());
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["id"].as_i64(), Some(3));
        assert_eq!(value["phone"].as_str(), Some("555-0100"));
    }

    #[actix_web::test]
    async fn logout_clears_the_cookie() {
        let app = actix_test::init_service(test_app(MockLoginService::new())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post().uri("/api/logout").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .response()
            .cookies()
            .find(|c| c.name() == AUTH_COOKIE_NAME)
            .expect("removal cookie");
        assert_eq!(cookie.value(), "");
    }
}
