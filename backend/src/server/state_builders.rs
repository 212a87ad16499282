//! Builders wiring persistence adapters into HTTP state ports.

use std::sync::Arc;

use backend::domain::ports::{ClinicalPatients, FrontDeskPatients, LoginService};
use backend::domain::{CredentialHasher, PatientRecordsService, TokenService, UserDirectory};
use backend::inbound::http::session_config::CookieSettings;
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::persistence::{DbPool, DieselPatientStore, DieselUserRepository};

/// Build the login port over the Diesel user repository.
fn build_login_service(pool: &DbPool) -> Arc<dyn LoginService> {
    let repository = Arc::new(DieselUserRepository::new(pool.clone()));
    Arc::new(UserDirectory::new(repository, CredentialHasher::default()))
}

/// Build both patient ports over one records service.
fn build_patient_ports(
    pool: &DbPool,
) -> (Arc<dyn FrontDeskPatients>, Arc<dyn ClinicalPatients>) {
    let store = Arc::new(DieselPatientStore::new(pool.clone()));
    let service = Arc::new(PatientRecordsService::new(store));
    (service.clone(), service)
}

/// Assemble the shared [`HttpState`] from a connection pool.
pub(super) fn build_http_state(
    pool: &DbPool,
    tokens: Arc<TokenService>,
    cookie: CookieSettings,
) -> HttpState {
    let (front_desk, clinical) = build_patient_ports(pool);
    HttpState::new(
        HttpStatePorts {
            login: build_login_service(pool),
            front_desk,
            clinical,
        },
        tokens,
        cookie,
    )
}
