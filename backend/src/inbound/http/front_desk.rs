//! Front-desk patient handlers for the receptionist scope.
//!
//! ```text
//! POST   /api/receptionist/               register a patient
//! GET    /api/receptionist/{aadhar_id}    look up by Aadhaar number
//! PUT    /api/receptionist/{patient_id}   replace a patient's fields
//! DELETE /api/receptionist/{patient_id}   remove a patient
//! ```
//!
//! The scope is gated by `RequireSession` and `RequireRole(Receptionist)`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    Error, NewPatient, PatientDraft, PatientId, PatientRecord, PatientValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_patient_id, patient_validation_error};
use crate::middleware::AuthenticatedPrincipal;

const PATIENT_ID: FieldName = FieldName::new("patient_id");

/// Patient body for registration and full updates.
///
/// `id` is ignored on registration. On update it is required and must equal
/// the path id.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct PatientRequest {
    #[schema(value_type = Option<i32>)]
    pub id: Option<PatientId>,
    #[schema(example = "Ravi Shankar")]
    pub name: String,
    pub phone: String,
    pub age: i32,
    /// Date of birth, `YYYY-MM-DD`.
    #[schema(example = "1990-04-12")]
    pub dob: String,
    pub gender: String,
    pub emergency_contact: String,
    #[schema(example = "1234-5678-9012")]
    pub aadhar: String,
    pub doctor_id: i32,
    pub payment_info: String,
    pub known_allergies: String,
    pub medications: String,
    pub other_health_issues: String,
    pub doctor_notes: String,
    pub consent: bool,
}

impl PatientRequest {
    fn into_parts(self) -> (Option<PatientId>, PatientDraft) {
        let Self {
            id,
            name,
            phone,
            age,
            dob,
            gender,
            emergency_contact,
            aadhar,
            doctor_id,
            payment_info,
            known_allergies,
            medications,
            other_health_issues,
            doctor_notes,
            consent,
        } = self;
        (
            id,
            PatientDraft {
                name,
                phone,
                age,
                dob,
                gender,
                emergency_contact,
                aadhar,
                doctor_id,
                payment_info,
                known_allergies,
                medications,
                other_health_issues,
                doctor_notes,
                consent,
            },
        )
    }
}

impl TryFrom<PatientRequest> for NewPatient {
    type Error = Error;

    fn try_from(value: PatientRequest) -> Result<Self, Self::Error> {
        let (_, draft) = value.into_parts();
        NewPatient::try_from_draft(draft).map_err(patient_validation_error)
    }
}

/// Response body for a successful registration.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedPatient {
    #[schema(value_type = i32, example = 12)]
    pub id: PatientId,
}

/// Register a new patient.
#[utoipa::path(
    post,
    path = "/api/receptionist/",
    request_body = PatientRequest,
    responses(
        (status = 200, description = "Patient registered", body = CreatedPatient),
        (status = 400, description = "Invalid request or unknown doctor", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Duplicate Aadhaar number", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["receptionist"],
    operation_id = "registerPatient"
)]
#[post("/")]
pub async fn register_patient(
    state: web::Data<HttpState>,
    principal: AuthenticatedPrincipal,
    payload: web::Json<PatientRequest>,
) -> ApiResult<web::Json<CreatedPatient>> {
    let patient = NewPatient::try_from(payload.into_inner())?;
    let id = state.front_desk.register(&patient).await?;
    info!(
        patient_id = id.get(),
        by = principal.principal().user_id().get(),
        "patient registered"
    );
    Ok(web::Json(CreatedPatient { id }))
}

/// Look a patient up by Aadhaar number.
#[utoipa::path(
    get,
    path = "/api/receptionist/{aadhar_id}",
    params(("aadhar_id" = String, Path, description = "Aadhaar number")),
    responses(
        (status = 200, description = "Patient record", body = PatientRecord),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "No such patient", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["receptionist"],
    operation_id = "findPatient"
)]
#[get("/{aadhar_id}")]
pub async fn find_patient(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PatientRecord>> {
    let record = state.front_desk.find_by_aadhar(path.as_str()).await?;
    Ok(web::Json(record))
}

/// Replace every editable field of a patient.
#[utoipa::path(
    put,
    path = "/api/receptionist/{patient_id}",
    params(("patient_id" = i32, Path, description = "Patient id")),
    request_body = PatientRequest,
    responses(
        (status = 200, description = "Updated record", body = PatientRecord),
        (status = 400, description = "Invalid request, missing or mismatched id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "No such patient", body = Error),
        (status = 409, description = "Duplicate Aadhaar number", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["receptionist"],
    operation_id = "updatePatient"
)]
#[put("/{patient_id}")]
pub async fn update_patient(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<PatientRequest>,
) -> ApiResult<web::Json<PatientRecord>> {
    let id = parse_patient_id(path.as_str(), PATIENT_ID)?;
    let (body_id, draft) = payload.into_inner().into_parts();
    let body_id = body_id
        .ok_or(PatientValidationError::MissingId)
        .map_err(patient_validation_error)?;
    id.ensure_matches(body_id)
        .map_err(patient_validation_error)?;
    let patient = NewPatient::try_from_draft(draft).map_err(patient_validation_error)?;
    let record = state.front_desk.replace(id, &patient).await?;
    Ok(web::Json(record))
}

/// Remove a patient.
#[utoipa::path(
    delete,
    path = "/api/receptionist/{patient_id}",
    params(("patient_id" = i32, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient deleted"),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "No such patient", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["receptionist"],
    operation_id = "deletePatient"
)]
#[delete("/{patient_id}")]
pub async fn delete_patient(
    state: web::Data<HttpState>,
    principal: AuthenticatedPrincipal,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_patient_id(path.as_str(), PATIENT_ID)?;
    state.front_desk.remove(id).await?;
    info!(
        patient_id = id.get(),
        by = principal.principal().user_id().get(),
        "patient deleted"
    );
    Ok(HttpResponse::Ok().json(json!({ "message": "patient deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockFrontDeskPatients;
    use crate::domain::{DoctorId, Role};
    use crate::inbound::http::test_utils::{TestPorts, auth_cookie, test_state, test_tokens};
    use crate::middleware::{RequireRole, RequireSession};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::{NaiveDate, Utc};
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};
    use serde_json::Value;

    #[fixture]
    fn request() -> PatientRequest {
        PatientRequest {
            name: "Ravi Shankar".into(),
            phone: "555-0199".into(),
            age: 34,
            dob: "1990-04-12".into(),
            gender: "male".into(),
            aadhar: "1234-5678-9012".into(),
            doctor_id: 7,
            consent: true,
            ..PatientRequest::default()
        }
    }

    fn record(id: i32) -> PatientRecord {
        let now = Utc::now();
        PatientRecord {
            id: PatientId::new(id),
            name: "Ravi Shankar".into(),
            phone: "555-0199".into(),
            age: 34,
            dob: NaiveDate::from_ymd_opt(1990, 4, 12).expect("valid date"),
            gender: "male".into(),
            emergency_contact: String::new(),
            aadhar: "1234-5678-9012".into(),
            doctor_id: DoctorId::new(7),
            payment_info: String::new(),
            known_allergies: String::new(),
            medications: String::new(),
            other_health_issues: String::new(),
            doctor_notes: String::new(),
            consent: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn test_app(
        front_desk: MockFrontDeskPatients,
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
                front_desk: Some(front_desk),
                ..TestPorts::default()
            },
            test_tokens(),
        );
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/receptionist")
                .wrap(RequireRole::new(Role::Receptionist))
                .wrap(RequireSession::new(test_tokens()))
                .service(register_patient)
                .service(find_patient)
                .service(update_patient)
                .service(delete_patient),
        )
    }

    fn as_receptionist(req: actix_test::TestRequest) -> actix_test::TestRequest {
        req.cookie(auth_cookie(&test_tokens(), 3, Role::Receptionist))
    }

    #[rstest]
    #[actix_web::test]
    async fn register_returns_the_new_id(request: PatientRequest) {
        let mut front_desk = MockFrontDeskPatients::new();
        front_desk
            .expect_register()
            .withf(|patient| patient.aadhar() == "1234-5678-9012")
            .times(1)
            .returning(|_| Ok(PatientId::new(12)));
        let app = actix_test::init_service(test_app(front_desk)).await;

        let req = as_receptionist(
            actix_test::TestRequest::post()
                .uri("/api/receptionist/")
                .set_json(&request),
        );
        let res = actix_test::call_service(&app, req.to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body, serde_json::json!({ "id": 12 }));
    }

    #[rstest]
    #[actix_web::test]
    async fn register_rejects_malformed_dob_before_storage(mut request: PatientRequest) {
        request.dob = "12/04/1990".into();
        let mut front_desk = MockFrontDeskPatients::new();
        front_desk.expect_register().times(0);
        let app = actix_test::init_service(test_app(front_desk)).await;

        let req = as_receptionist(
            actix_test::TestRequest::post()
                .uri("/api/receptionist/")
                .set_json(&request),
        );
        let res = actix_test::call_service(&app, req.to_request()).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "dob");
    }

    #[rstest]
    #[actix_web::test]
    async fn update_rejects_mismatched_body_id(mut request: PatientRequest) {
        request.id = Some(PatientId::new(5));
        let mut front_desk = MockFrontDeskPatients::new();
        front_desk.expect_replace().times(0);
        let app = actix_test::init_service(test_app(front_desk)).await;

        let req = as_receptionist(
            actix_test::TestRequest::put()
                .uri("/api/receptionist/4")
                .set_json(&request),
        );
        let res = actix_test::call_service(&app, req.to_request()).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["code"], "id_mismatch");
    }

    #[rstest]
    #[actix_web::test]
    async fn update_requires_a_body_id(mut request: PatientRequest) {
        request.id = None;
        let mut front_desk = MockFrontDeskPatients::new();
        front_desk.expect_replace().times(0);
        let app = actix_test::init_service(test_app(front_desk)).await;

        let req = as_receptionist(
            actix_test::TestRequest::put()
                .uri("/api/receptionist/4")
                .set_json(&request),
        );
        let res = actix_test::call_service(&app, req.to_request()).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "id");
        assert_eq!(body["details"]["code"], "missing_id");
    }

    #[rstest]
    #[actix_web::test]
    async fn update_with_matching_id_returns_persisted_record(mut request: PatientRequest) {
        request.id = Some(PatientId::new(4));
        let mut front_desk = MockFrontDeskPatients::new();
        front_desk
            .expect_replace()
            .withf(|id, _| *id == PatientId::new(4))
            .times(1)
            .returning(|id, _| Ok(record(id.get())));
        let app = actix_test::init_service(test_app(front_desk)).await;

        let req = as_receptionist(
            actix_test::TestRequest::put()
                .uri("/api/receptionist/4")
                .set_json(&request),
        );
        let res = actix_test::call_service(&app, req.to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["id"], 4);
        assert_eq!(body["dob"], "1990-04-12");
    }

    #[rstest]
    #[case("/api/receptionist/abc")]
    #[case("/api/receptionist/1.5")]
    #[actix_web::test]
    async fn delete_rejects_non_integer_ids(#[case] uri: &str) {
        let mut front_desk = MockFrontDeskPatients::new();
        front_desk.expect_remove().times(0);
        let app = actix_test::init_service(test_app(front_desk)).await;

        let req = as_receptionist(actix_test::TestRequest::delete().uri(uri));
        let res = actix_test::call_service(&app, req.to_request()).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn delete_missing_patient_is_not_found() {
        let mut front_desk = MockFrontDeskPatients::new();
        front_desk
            .expect_remove()
            .with(eq(PatientId::new(99)))
            .times(1)
            .returning(|_| Err(Error::not_found("patient not found")));
        let app = actix_test::init_service(test_app(front_desk)).await;

        let req = as_receptionist(actix_test::TestRequest::delete().uri("/api/receptionist/99"));
        let res = actix_test::call_service(&app, req.to_request()).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn delete_confirms_removal() {
        let mut front_desk = MockFrontDeskPatients::new();
        front_desk.expect_remove().times(1).returning(|_| Ok(()));
        let app = actix_test::init_service(test_app(front_desk)).await;

        let req = as_receptionist(actix_test::TestRequest::delete().uri("/api/receptionist/4"));
        let res = actix_test::call_service(&app, req.to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], "patient deleted successfully");
    }

    #[actix_web::test]
    async fn lookup_by_aadhar_returns_the_record() {
        let mut front_desk = MockFrontDeskPatients::new();
        front_desk
            .expect_find_by_aadhar()
            .withf(|aadhar| aadhar == "1234-5678-9012")
            .times(1)
            .returning(|_| Ok(record(4)));
        let app = actix_test::init_service(test_app(front_desk)).await;

        let req = as_receptionist(
            actix_test::TestRequest::get().uri("/api/receptionist/1234-5678-9012"),
        );
        let res = actix_test::call_service(&app, req.to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["aadhar"], "1234-5678-9012");
    }
}
