//! Role-scoped patient services.
//!
//! [`PatientRecordsService`] implements both patient driving ports over a
//! single [`PatientStore`]. The front-desk port works with full records; the
//! clinical port only ever returns clinical views. Store failures are mapped
//! onto domain error codes here so every not-found condition surfaces the
//! same way.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{ClinicalPatients, FrontDeskPatients, PatientStore, PatientStoreError};
use crate::domain::{
    ClinicalUpdate, DoctorId, Error, NewPatient, PatientClinicalView, PatientId, PatientRecord,
};

/// Patient service implementing the front-desk and clinical ports.
#[derive(Clone)]
pub struct PatientRecordsService<S> {
    store: Arc<S>,
}

impl<S> PatientRecordsService<S> {
    /// Create a service over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

fn map_store_error(error: PatientStoreError) -> Error {
    match error {
        PatientStoreError::NotFound => Error::not_found("patient not found"),
        PatientStoreError::Conflict { message } => {
            warn!(%message, "patient write rejected by uniqueness constraint");
            Error::conflict("a patient with this aadhar already exists")
                .with_details(json!({ "field": "aadhar", "code": "duplicate_aadhar" }))
        }
        PatientStoreError::UnknownDoctor { .. } => {
            Error::invalid_request("assigned doctor does not exist")
                .with_details(json!({ "field": "doctor_id", "code": "unknown_doctor" }))
        }
        PatientStoreError::Timeout { message } => {
            warn!(%message, "patient store deadline elapsed");
            Error::service_unavailable("patient store timed out")
        }
        PatientStoreError::Connection { message } => {
            warn!(%message, "patient store connection failed");
            Error::service_unavailable("patient store unavailable")
        }
        PatientStoreError::Query { message } => {
            Error::internal(format!("patient store error: {message}"))
        }
    }
}

#[async_trait]
impl<S> FrontDeskPatients for PatientRecordsService<S>
where
    S: PatientStore,
{
    async fn register(&self, patient: &NewPatient) -> Result<PatientId, Error> {
        self.store.insert(patient).await.map_err(map_store_error)
    }

    async fn find_by_aadhar(&self, aadhar: &str) -> Result<PatientRecord, Error> {
        self.store
            .find_by_aadhar(aadhar)
            .await
            .map_err(map_store_error)
    }

    async fn replace(&self, id: PatientId, patient: &NewPatient) -> Result<PatientRecord, Error> {
        self.store
            .update(id, patient)
            .await
            .map_err(map_store_error)
    }

    async fn remove(&self, id: PatientId) -> Result<(), Error> {
        self.store.delete(id).await.map_err(map_store_error)
    }
}

#[async_trait]
impl<S> ClinicalPatients for PatientRecordsService<S>
where
    S: PatientStore,
{
    async fn assigned_to(&self, doctor: DoctorId) -> Result<Vec<PatientClinicalView>, Error> {
        self.store
            .find_by_doctor(doctor)
            .await
            .map_err(map_store_error)
    }

    async fn update_clinical(
        &self,
        id: PatientId,
        update: &ClinicalUpdate,
    ) -> Result<PatientClinicalView, Error> {
        self.store
            .update_clinical(id, update)
            .await
            .map_err(map_store_error)
    }
}
