//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed core of the clinic backend. Nothing in
//! here knows about HTTP or SQL; adapters reach the domain through the ports
//! in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Principal / Role / UserId: the authenticated identity of a request.
//! - CredentialHasher / TokenService: password hashing and session tokens.
//! - UserDirectory: credential verification and role profile selection.
//! - PatientRecordsService: role-scoped patient access.

pub mod auth;
pub mod credential_hasher;
pub mod error;
pub mod patient;
pub mod patient_records;
pub mod ports;
pub mod principal;
pub mod profile;
pub mod token_service;
pub mod trace_id;
pub mod user_directory;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::credential_hasher::{CredentialHasher, HashedCredential, HasherParams, HashingError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::patient::{
    ClinicalUpdate, NewPatient, PatientClinicalView, PatientDraft, PatientId, PatientRecord,
    PatientValidationError, parse_dob,
};
pub use self::patient_records::PatientRecordsService;
pub use self::principal::{DoctorId, Principal, Role, UnknownRole, UserId};
pub use self::profile::{AuthenticatedUser, DoctorProfile, ReceptionistProfile, StaffProfile};
pub use self::token_service::{
    SESSION_TTL, SessionClaims, SessionToken, SigningKey, TokenError, TokenService,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user_directory::{DirectoryError, UserDirectory};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
