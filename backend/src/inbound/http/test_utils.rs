//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use mockable::DefaultClock;

use crate::domain::ports::{
    ClinicalPatients, FrontDeskPatients, LoginService, MockClinicalPatients,
    MockFrontDeskPatients, MockLoginService,
};
use crate::domain::{Principal, Role, SigningKey, TokenService, UserId};
use crate::inbound::http::session::session_cookie;
use crate::inbound::http::session_config::CookieSettings;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Token service keyed with a fixed test secret.
pub fn test_tokens() -> Arc<TokenService> {
    let key = SigningKey::new(b"handler-tests-signing-secret-0123".to_vec());
    Arc::new(TokenService::new(&key, Arc::new(DefaultClock)))
}

/// Port overrides for [`test_state`]; unset ports are strict mocks that
/// fail the test when called.
#[derive(Default)]
pub struct TestPorts {
    pub login: Option<MockLoginService>,
    pub front_desk: Option<MockFrontDeskPatients>,
    pub clinical: Option<MockClinicalPatients>,
}

/// Build handler state around `ports` and `tokens`.
pub fn test_state(ports: TestPorts, tokens: Arc<TokenService>) -> HttpState {
    let TestPorts {
        login,
        front_desk,
        clinical,
    } = ports;
    let login: Arc<dyn LoginService> = Arc::new(login.unwrap_or_default());
    let front_desk: Arc<dyn FrontDeskPatients> = Arc::new(front_desk.unwrap_or_default());
    let clinical: Arc<dyn ClinicalPatients> = Arc::new(clinical.unwrap_or_default());
    HttpState::new(
        HttpStatePorts {
            login,
            front_desk,
            clinical,
        },
        tokens,
        CookieSettings::default(),
    )
}

/// Issue an `auth_token` cookie for a user holding `role`.
pub fn auth_cookie(tokens: &TokenService, user_id: i32, role: Role) -> Cookie<'static> {
    let token = tokens
        .issue(&Principal::new(UserId::new(user_id), role))
        .expect("token issues");
    session_cookie(token.as_str(), CookieSettings::default())
}
