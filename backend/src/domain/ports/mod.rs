//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`LoginService`, `FrontDeskPatients`, `ClinicalPatients`)
//! are called by inbound adapters. Driven ports (`UserRepository`,
//! `PatientStore`) are implemented by outbound adapters and expose typed
//! errors generated with [`define_port_error`].

mod macros;
pub(crate) use macros::define_port_error;

mod clinical_patients;
mod front_desk_patients;
mod login_service;
mod patient_store;
mod user_repository;

#[cfg(test)]
pub use clinical_patients::MockClinicalPatients;
pub use clinical_patients::ClinicalPatients;
#[cfg(test)]
pub use front_desk_patients::MockFrontDeskPatients;
pub use front_desk_patients::FrontDeskPatients;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use patient_store::MockPatientStore;
pub use patient_store::{PatientStore, PatientStoreError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    DoctorProfileFields, ReceptionistProfileFields, UserAccountRecord, UserPersistenceError,
    UserRepository,
};
