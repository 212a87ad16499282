//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live next
//! to the rows they read.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::ports::{DoctorProfileFields, ReceptionistProfileFields};
use crate::domain::{
    ClinicalUpdate, DoctorId, NewPatient, PatientClinicalView, PatientId, PatientRecord,
};

use super::schema::{doctors, patients, receptionists, users};

// ---------------------------------------------------------------------------
// Account models
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub password_hash: String,
}

/// Doctor columns read through the login join.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = doctors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DoctorProfileRow {
    pub name: String,
    pub specialty: String,
    pub emergency_contact: String,
    pub license_number: String,
    pub experience_years: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DoctorProfileRow> for DoctorProfileFields {
    fn from(row: DoctorProfileRow) -> Self {
        Self {
            name: row.name,
            specialty: row.specialty,
            emergency_contact: row.emergency_contact,
            license_number: row.license_number,
            experience_years: row.experience_years,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Receptionist columns read through the login join.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = receptionists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReceptionistProfileRow {
    pub name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReceptionistProfileRow> for ReceptionistProfileFields {
    fn from(row: ReceptionistProfileRow) -> Self {
        Self {
            name: row.name,
            phone: row.phone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Patient models
// ---------------------------------------------------------------------------

/// Row struct for reading full patient records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PatientRow {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub age: i32,
    pub dob: NaiveDate,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PatientRow> for PatientRecord {
    fn from(row: PatientRow) -> Self {
        Self {
            id: PatientId::new(row.id),
            name: row.name,
            phone: row.phone,
            age: row.age,
            dob: row.dob,
            gender: row.gender,
            emergency_contact: row.emergency_contact,
            aadhar: row.aadhar,
            doctor_id: DoctorId::new(row.doctor_id),
            payment_info: row.payment_info,
            known_allergies: row.known_allergies,
            medications: row.medications,
            other_health_issues: row.other_health_issues,
            doctor_notes: row.doctor_notes,
            consent: row.consent,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Row struct for the clinical projection; omits restricted columns.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PatientClinicalRow {
    pub id: i32,
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

impl From<PatientClinicalRow> for PatientClinicalView {
    fn from(row: PatientClinicalRow) -> Self {
        Self {
            id: PatientId::new(row.id),
            name: row.name,
            phone: row.phone,
            age: row.age,
            gender: row.gender,
            emergency_contact: row.emergency_contact,
            known_allergies: row.known_allergies,
            medications: row.medications,
            other_health_issues: row.other_health_issues,
            doctor_notes: row.doctor_notes,
            consent: row.consent,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Caller-editable patient columns, used for inserts and full replaces.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = patients)]
pub(crate) struct PatientWriteRow<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub age: i32,
    pub dob: NaiveDate,
    pub gender: &'a str,
    pub emergency_contact: &'a str,
    pub aadhar: &'a str,
    pub doctor_id: i32,
    pub payment_info: &'a str,
    pub known_allergies: &'a str,
    pub medications: &'a str,
    pub other_health_issues: &'a str,
    pub doctor_notes: &'a str,
    pub consent: bool,
}

impl<'a> From<&'a NewPatient> for PatientWriteRow<'a> {
    fn from(patient: &'a NewPatient) -> Self {
        Self {
            name: patient.name(),
            phone: patient.phone(),
            age: patient.age(),
            dob: patient.dob(),
            gender: patient.gender(),
            emergency_contact: patient.emergency_contact(),
            aadhar: patient.aadhar(),
            doctor_id: patient.doctor_id().get(),
            payment_info: patient.payment_info(),
            known_allergies: patient.known_allergies(),
            medications: patient.medications(),
            other_health_issues: patient.other_health_issues(),
            doctor_notes: patient.doctor_notes(),
            consent: patient.consent(),
        }
    }
}

/// Clinical columns; `None` fields are left untouched by the update.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = patients)]
pub(crate) struct ClinicalChangeset<'a> {
    pub known_allergies: Option<&'a str>,
    pub medications: Option<&'a str>,
    pub other_health_issues: Option<&'a str>,
    pub doctor_notes: Option<&'a str>,
}

impl<'a> From<&'a ClinicalUpdate> for ClinicalChangeset<'a> {
    fn from(update: &'a ClinicalUpdate) -> Self {
        Self {
            known_allergies: update.known_allergies(),
            medications: update.medications(),
            other_health_issues: update.other_health_issues(),
            doctor_notes: update.doctor_notes(),
        }
    }
}
