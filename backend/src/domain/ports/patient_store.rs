//! Port for patient persistence.
//!
//! Adapters enforce a per-operation deadline and report expiry as
//! [`PatientStoreError::Timeout`].

use async_trait::async_trait;

use crate::domain::{
    ClinicalUpdate, DoctorId, NewPatient, PatientClinicalView, PatientId, PatientRecord,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by patient store adapters.
    pub enum PatientStoreError {
        /// No patient matched the lookup key.
        NotFound => "patient not found",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } => "patient conflicts with an existing record: {message}",
        /// The referenced doctor does not exist.
        UnknownDoctor { message: String } => "assigned doctor does not exist: {message}",
        /// The operation exceeded its deadline.
        Timeout { message: String } => "patient store timed out: {message}",
        /// Store connection could not be established.
        Connection { message: String } => "patient store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "patient store query failed: {message}",
    }
}

/// Port for reading and writing patient rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// Fetch the full record registered under an Aadhaar number.
    async fn find_by_aadhar(&self, aadhar: &str) -> Result<PatientRecord, PatientStoreError>;

    /// List clinical views of the patients assigned to `doctor`.
    async fn find_by_doctor(
        &self,
        doctor: DoctorId,
    ) -> Result<Vec<PatientClinicalView>, PatientStoreError>;

    /// Insert a patient and return the assigned id.
    async fn insert(&self, patient: &NewPatient) -> Result<PatientId, PatientStoreError>;

    /// Replace every caller-editable field and return the persisted row.
    async fn update(
        &self,
        id: PatientId,
        patient: &NewPatient,
    ) -> Result<PatientRecord, PatientStoreError>;

    /// Write only the supplied clinical fields and return the clinical view.
    async fn update_clinical(
        &self,
        id: PatientId,
        update: &ClinicalUpdate,
    ) -> Result<PatientClinicalView, PatientStoreError>;

    /// Delete a patient.
    async fn delete(&self, id: PatientId) -> Result<(), PatientStoreError>;
}
