//! Patient records and their role-scoped projections.
//!
//! Front-desk staff work with the full [`PatientRecord`]. Clinical staff only
//! ever see a [`PatientClinicalView`], which omits identity and billing
//! fields, and may only change the four clinical text fields through a
//! [`ClinicalUpdate`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DoctorId;

/// Date format accepted for dates of birth.
pub const DOB_FORMAT: &str = "%Y-%m-%d";

/// Upper bound accepted for a patient's age.
pub const MAX_AGE: i32 = 150;

/// Validation errors raised while building patient inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatientValidationError {
    /// Name was blank once trimmed.
    EmptyName,
    /// Aadhaar number was blank once trimmed.
    EmptyAadhar,
    /// Age outside `0..=MAX_AGE`.
    AgeOutOfRange { age: i32 },
    /// Date of birth was not `YYYY-MM-DD`.
    InvalidDob { value: String },
    /// Body id of a full update differs from the path id.
    IdMismatch { path: PatientId, body: PatientId },
    /// A full update omitted the body id.
    MissingId,
    /// A clinical update supplied no fields.
    EmptyClinicalUpdate,
}

impl PatientValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyAadhar => "aadhar",
            Self::AgeOutOfRange { .. } => "age",
            Self::InvalidDob { .. } => "dob",
            Self::IdMismatch { .. } | Self::MissingId => "id",
            Self::EmptyClinicalUpdate => "body",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::EmptyAadhar => "empty_aadhar",
            Self::AgeOutOfRange { .. } => "age_out_of_range",
            Self::InvalidDob { .. } => "invalid_date",
            Self::IdMismatch { .. } => "id_mismatch",
            Self::MissingId => "missing_id",
            Self::EmptyClinicalUpdate => "empty_update",
        }
    }
}

impl fmt::Display for PatientValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyAadhar => write!(f, "aadhar must not be empty"),
            Self::AgeOutOfRange { age } => {
                write!(f, "age must be between 0 and {MAX_AGE}, got {age}")
            }
            Self::InvalidDob { value } => {
                write!(f, "invalid date format for dob: {value:?} (expected YYYY-MM-DD)")
            }
            Self::IdMismatch { path, body } => {
                write!(f, "patient id in body ({body}) and uri ({path}) do not match")
            }
            Self::MissingId => write!(f, "patient id is required in the request body"),
            Self::EmptyClinicalUpdate => {
                write!(f, "clinical update must set at least one field")
            }
        }
    }
}

impl std::error::Error for PatientValidationError {}

/// Identifier of a row in the `patients` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PatientId(i32);

impl PatientId {
    /// Wrap a raw database identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw integer value as stored.
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Reject a body id that differs from this (path) id.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::PatientId;
    ///
    /// let path = PatientId::new(4);
    /// assert!(path.ensure_matches(PatientId::new(4)).is_ok());
    /// assert!(path.ensure_matches(PatientId::new(5)).is_err());
    /// ```
    pub fn ensure_matches(self, body: PatientId) -> Result<(), PatientValidationError> {
        if self == body {
            Ok(())
        } else {
            Err(PatientValidationError::IdMismatch { path: self, body })
        }
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i32>().map(Self)
    }
}

/// Full patient record as seen by front-desk staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PatientRecord {
    #[schema(value_type = i32, example = 12)]
    pub id: PatientId,
    #[schema(example = "Ravi Shankar")]
    pub name: String,
    pub phone: String,
    pub age: i32,
    /// Date of birth, `YYYY-MM-DD`.
    #[schema(value_type = String, example = "1990-04-12")]
    pub dob: NaiveDate,
    pub gender: String,
    pub emergency_contact: String,
    /// Aadhaar number; unique across patients.
    #[schema(example = "1234-5678-9012")]
    pub aadhar: String,
    #[schema(value_type = i32, example = 7)]
    pub doctor_id: DoctorId,
    pub payment_info: String,
    pub known_allergies: String,
    pub medications: String,
    pub other_health_issues: String,
    pub doctor_notes: String,
    pub consent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Clinical projection of a patient record.
///
/// Never carries the Aadhaar number, payment details, date of birth or the
/// assigned doctor id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PatientClinicalView {
    #[schema(value_type = i32, example = 12)]
    pub id: PatientId,
    pub name: String,
    pub phone: String,
    pub age: i32,
    pub gender: String,
    pub emergency_contact: String,
    pub known_allergies: String,
    pub medications: String,
    pub other_health_issues: String,
    pub doctor_notes: String,
    pub consent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PatientRecord> for PatientClinicalView {
    fn from(record: PatientRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            phone: record.phone,
            age: record.age,
            gender: record.gender,
            emergency_contact: record.emergency_contact,
            known_allergies: record.known_allergies,
            medications: record.medications,
            other_health_issues: record.other_health_issues,
            doctor_notes: record.doctor_notes,
            consent: record.consent,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Unvalidated patient fields as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientDraft {
    pub name: String,
    pub phone: String,
    pub age: i32,
    /// Raw date of birth, expected as `YYYY-MM-DD`.
    pub dob: String,
    pub gender: String,
    pub emergency_contact: String,
    pub aadhar: String,
    pub doctor_id: i32,
    pub payment_info: String,
    pub known_allergies: String,
    pub medications: String,
    pub other_health_issues: String,
    pub doctor_notes: String,
    pub consent: bool,
}

/// Validated patient fields for a create or full replace.
///
/// ## Invariants
/// - `name` and `aadhar` are trimmed and non-empty.
/// - `age` lies within `0..=MAX_AGE`.
/// - `dob` is a calendar date.
///
/// # Examples
/// ```
/// use backend::domain::{NewPatient, PatientDraft};
///
/// let patient = NewPatient::try_from_draft(PatientDraft {
///     name: "Ravi".into(),
///     age: 34,
///     dob: "1990-04-12".into(),
///     aadhar: "1234-5678-9012".into(),
///     doctor_id: 7,
///     ..PatientDraft::default()
/// })
/// .unwrap();
/// assert_eq!(patient.dob().to_string(), "1990-04-12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    name: String,
    phone: String,
    age: i32,
    dob: NaiveDate,
    gender: String,
    emergency_contact: String,
    aadhar: String,
    doctor_id: DoctorId,
    payment_info: String,
    known_allergies: String,
    medications: String,
    other_health_issues: String,
    doctor_notes: String,
    consent: bool,
}

impl NewPatient {
    /// Validate a draft.
    pub fn try_from_draft(draft: PatientDraft) -> Result<Self, PatientValidationError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(PatientValidationError::EmptyName);
        }
        let aadhar = draft.aadhar.trim();
        if aadhar.is_empty() {
            return Err(PatientValidationError::EmptyAadhar);
        }
        if !(0..=MAX_AGE).contains(&draft.age) {
            return Err(PatientValidationError::AgeOutOfRange { age: draft.age });
        }
        let dob = parse_dob(&draft.dob)?;

        Ok(Self {
            name: name.to_owned(),
            aadhar: aadhar.to_owned(),
            phone: draft.phone,
            age: draft.age,
            dob,
            gender: draft.gender,
            emergency_contact: draft.emergency_contact,
            doctor_id: DoctorId::new(draft.doctor_id),
            payment_info: draft.payment_info,
            known_allergies: draft.known_allergies,
            medications: draft.medications,
            other_health_issues: draft.other_health_issues,
            doctor_notes: draft.doctor_notes,
            consent: draft.consent,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn dob(&self) -> NaiveDate {
        self.dob
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn emergency_contact(&self) -> &str {
        &self.emergency_contact
    }

    pub fn aadhar(&self) -> &str {
        &self.aadhar
    }

    pub fn doctor_id(&self) -> DoctorId {
        self.doctor_id
    }

    pub fn payment_info(&self) -> &str {
        &self.payment_info
    }

    pub fn known_allergies(&self) -> &str {
        &self.known_allergies
    }

    pub fn medications(&self) -> &str {
        &self.medications
    }

    pub fn other_health_issues(&self) -> &str {
        &self.other_health_issues
    }

    pub fn doctor_notes(&self) -> &str {
        &self.doctor_notes
    }

    pub fn consent(&self) -> bool {
        self.consent
    }
}

/// Parse a `YYYY-MM-DD` date of birth.
pub fn parse_dob(raw: &str) -> Result<NaiveDate, PatientValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DOB_FORMAT).map_err(|_| {
        PatientValidationError::InvalidDob {
            value: raw.to_owned(),
        }
    })
}

/// Partial change to the clinical fields of a patient.
///
/// Only supplied fields are written; at least one must be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicalUpdate {
    known_allergies: Option<String>,
    medications: Option<String>,
    other_health_issues: Option<String>,
    doctor_notes: Option<String>,
}

impl ClinicalUpdate {
    /// Build an update, rejecting one that changes nothing.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ClinicalUpdate;
    ///
    /// let update = ClinicalUpdate::try_new(None, None, None, Some("rest".into())).unwrap();
    /// assert_eq!(update.doctor_notes(), Some("rest"));
    /// assert!(ClinicalUpdate::try_new(None, None, None, None).is_err());
    /// ```
    pub fn try_new(
        known_allergies: Option<String>,
        medications: Option<String>,
        other_health_issues: Option<String>,
        doctor_notes: Option<String>,
    ) -> Result<Self, PatientValidationError> {
        if known_allergies.is_none()
            && medications.is_none()
            && other_health_issues.is_none()
            && doctor_notes.is_none()
        {
            return Err(PatientValidationError::EmptyClinicalUpdate);
        }
        Ok(Self {
            known_allergies,
            medications,
            other_health_issues,
            doctor_notes,
        })
    }

    pub fn known_allergies(&self) -> Option<&str> {
        self.known_allergies.as_deref()
    }

    pub fn medications(&self) -> Option<&str> {
        self.medications.as_deref()
    }

    pub fn other_health_issues(&self) -> Option<&str> {
        self.other_health_issues.as_deref()
    }

    pub fn doctor_notes(&self) -> Option<&str> {
        self.doctor_notes.as_deref()
    }
}
