//! Driving port for clinical access to patients.
//!
//! Doctor handlers call this port; it only ever exposes
//! [`PatientClinicalView`]s.

use async_trait::async_trait;

use crate::domain::{ClinicalUpdate, DoctorId, Error, PatientClinicalView, PatientId};

/// Clinical operations available to the doctor role.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClinicalPatients: Send + Sync {
    /// Patients assigned to `doctor`.
    async fn assigned_to(&self, doctor: DoctorId) -> Result<Vec<PatientClinicalView>, Error>;

    /// Apply a clinical update and return the refreshed view.
    async fn update_clinical(
        &self,
        id: PatientId,
        update: &ClinicalUpdate,
    ) -> Result<PatientClinicalView, Error>;
}
