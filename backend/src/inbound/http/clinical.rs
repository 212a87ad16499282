//! Clinical handlers for the doctor scope.
//!
//! ```text
//! GET   /api/doctor/myPatients          clinical views of assigned patients
//! PATCH /api/doctor/{patient_id}        update clinical fields
//! ```

use actix_web::{get, patch, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{ClinicalUpdate, DoctorId, Error, PatientClinicalView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_patient_id, patient_validation_error};
use crate::middleware::AuthenticatedPrincipal;

const PATIENT_ID: FieldName = FieldName::new("patient_id");

/// Partial clinical update. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ClinicalUpdateRequest {
    pub known_allergies: Option<String>,
    pub medications: Option<String>,
    pub other_health_issues: Option<String>,
    pub doctor_notes: Option<String>,
}

impl TryFrom<ClinicalUpdateRequest> for ClinicalUpdate {
    type Error = Error;

    fn try_from(value: ClinicalUpdateRequest) -> Result<Self, Self::Error> {
        let ClinicalUpdateRequest {
            known_allergies,
            medications,
            other_health_issues,
            doctor_notes,
        } = value;
        ClinicalUpdate::try_new(known_allergies, medications, other_health_issues, doctor_notes)
            .map_err(patient_validation_error)
    }
}

/// List patients assigned to the calling doctor.
#[utoipa::path(
    get,
    path = "/api/doctor/myPatients",
    responses(
        (status = 200, description = "Assigned patients", body = [PatientClinicalView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["doctor"],
    operation_id = "myPatients"
)]
#[get("/myPatients")]
pub async fn my_patients(
    state: web::Data<HttpState>,
    principal: AuthenticatedPrincipal,
) -> ApiResult<web::Json<Vec<PatientClinicalView>>> {
    let doctor = DoctorId::new(principal.principal().user_id().get());
    let patients = state.clinical.assigned_to(doctor).await?;
    Ok(web::Json(patients))
}

/// Update the clinical fields of a patient.
///
/// Any doctor may update any patient; assignment is not checked.
#[utoipa::path(
    patch,
    path = "/api/doctor/{patient_id}",
    params(("patient_id" = i32, Path, description = "Patient id")),
    request_body = ClinicalUpdateRequest,
    responses(
        (status = 200, description = "Updated clinical view", body = PatientClinicalView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "No such patient", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["doctor"],
    operation_id = "updateClinical"
)]
#[patch("/{patient_id}")]
pub async fn update_clinical(
    state: web::Data<HttpState>,
    principal: AuthenticatedPrincipal,
    path: web::Path<String>,
    payload: web::Json<ClinicalUpdateRequest>,
) -> ApiResult<web::Json<PatientClinicalView>> {
    let id = parse_patient_id(path.as_str(), PATIENT_ID)?;
    let update = ClinicalUpdate::try_from(payload.into_inner())?;
    let view = state.clinical.update_clinical(id, &update).await?;
    info!(
        patient_id = id.get(),
        by = principal.principal().user_id().get(),
        "clinical record updated"
    );
    Ok(web::Json(view))
}
