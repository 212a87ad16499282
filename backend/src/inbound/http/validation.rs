//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, PatientId, PatientValidationError};

/// Validation error codes raised by the HTTP layer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code,
        }))
    }

    fn with_value(self, code: &str, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code,
        }))
    }
}

/// Map a domain patient validation failure onto a `400` with field details.
pub(crate) fn patient_validation_error(err: PatientValidationError) -> Error {
    let validation = ValidationError::new(err.field(), err.to_string());
    match &err {
        PatientValidationError::InvalidDob { value } => validation.with_value(err.code(), value),
        _ => validation.with_code(err.code()),
    }
}

pub(crate) fn invalid_id_error(field: FieldName, value: &str) -> Error {
    ValidationError::new(
        field.as_str(),
        format!("{} must be an integer id", field.as_str()),
    )
    .with_value(ErrorCode::InvalidId.as_str(), value)
}

/// Parse a patient id taken from the request path.
pub(crate) fn parse_patient_id(value: &str, field: FieldName) -> Result<PatientId, Error> {
    value
        .parse::<PatientId>()
        .map_err(|_| invalid_id_error(field, value))
}
