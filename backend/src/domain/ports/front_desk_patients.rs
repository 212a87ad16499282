//! Driving port for front-desk patient management.
//!
//! Receptionist handlers call this port; it works with full patient records.

use async_trait::async_trait;

use crate::domain::{Error, NewPatient, PatientId, PatientRecord};

/// Full-record operations available to the receptionist role.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrontDeskPatients: Send + Sync {
    /// Register a new patient.
    async fn register(&self, patient: &NewPatient) -> Result<PatientId, Error>;

    /// Look a patient up by Aadhaar number.
    async fn find_by_aadhar(&self, aadhar: &str) -> Result<PatientRecord, Error>;

    /// Replace a patient's fields.
    async fn replace(&self, id: PatientId, patient: &NewPatient) -> Result<PatientRecord, Error>;

    /// Remove a patient.
    async fn remove(&self, id: PatientId) -> Result<(), Error>;
}
