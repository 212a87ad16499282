//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, regenerate this file with
//! `diesel print-schema` or update it by hand.

diesel::table! {
    /// Login accounts; one row per staff member.
    users (id) {
        /// Primary key, also the doctor id carried by doctor sessions.
        id -> Int4,
        /// Unique login email; joins onto the profile tables.
        email -> Varchar,
        /// Role discriminant: `doctor` or `receptionist`.
        role -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Varchar,
    }
}

diesel::table! {
    /// Doctor profiles keyed by email.
    doctors (id) {
        id -> Int4,
        name -> Varchar,
        email -> Varchar,
        specialty -> Varchar,
        emergency_contact -> Varchar,
        license_number -> Varchar,
        experience_years -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Receptionist profiles keyed by email.
    receptionists (id) {
        id -> Int4,
        name -> Varchar,
        email -> Varchar,
        phone -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Patient records.
    patients (id) {
        id -> Int4,
        name -> Varchar,
        phone -> Varchar,
        age -> Int4,
        dob -> Date,
        gender -> Varchar,
        emergency_contact -> Varchar,
        /// Aadhaar number; unique.
        aadhar -> Varchar,
        /// Assigned doctor (`users.id`).
        doctor_id -> Int4,
        payment_info -> Text,
        known_allergies -> Text,
        medications -> Text,
        other_health_issues -> Text,
        doctor_notes -> Text,
        consent -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(patients -> users (doctor_id));

diesel::allow_tables_to_appear_in_same_query!(doctors, patients, receptionists, users);
