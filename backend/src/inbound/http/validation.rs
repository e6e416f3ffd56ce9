//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain constructors report what is wrong; these helpers add the request
//! field and a stable machine-readable code so every endpoint shapes its
//! `400` payload the same way.

use serde_json::json;

use crate::domain::{
    AvailabilityValidationError, CompetenceValidationError, CredentialValidationError, Error,
    UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    Empty,
    TooLong,
    InvalidLength,
    InvalidCharacters,
    AmbiguousUsername,
    InvalidEmail,
    InvalidNationalId,
    InvalidUuid,
    UnknownRole,
    InvalidPassword,
    InvalidCompetenceType,
    InvalidYears,
    InvalidDate,
    InvertedRange,
    UnknownStatus,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooLong => "too_long",
            Self::InvalidLength => "invalid_length",
            Self::InvalidCharacters => "invalid_characters",
            Self::AmbiguousUsername => "ambiguous_username",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidNationalId => "invalid_national_id",
            Self::InvalidUuid => "invalid_uuid",
            Self::UnknownRole => "unknown_role",
            Self::InvalidPassword => "invalid_password",
            Self::InvalidCompetenceType => "invalid_competence_type",
            Self::InvalidYears => "invalid_years",
            Self::InvalidDate => "invalid_date",
            Self::InvertedRange => "inverted_range",
            Self::UnknownStatus => "unknown_status",
        }
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

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ErrorCode, index: usize) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "code": code.as_str(),
        }))
    }
}

/// Request field name for a domain field, in the API's camelCase.
fn wire_field(field: &str) -> &str {
    match field {
        "national_id" => "nationalId",
        other => other,
    }
}

fn user_field_error(err: &UserValidationError) -> (&'static str, ErrorCode) {
    match err {
        UserValidationError::InvalidId => ("id", ErrorCode::InvalidUuid),
        UserValidationError::Empty { field } => (*field, ErrorCode::Empty),
        UserValidationError::TooLong { field, .. } => (*field, ErrorCode::TooLong),
        UserValidationError::UsernameLength { .. } => ("username", ErrorCode::InvalidLength),
        UserValidationError::UsernameCharacters => ("username", ErrorCode::InvalidCharacters),
        UserValidationError::UsernameLooksLikeNationalId => {
            ("username", ErrorCode::AmbiguousUsername)
        }
        UserValidationError::InvalidEmail => ("email", ErrorCode::InvalidEmail),
        UserValidationError::InvalidNationalId => ("national_id", ErrorCode::InvalidNationalId),
        UserValidationError::UnknownRole => ("role", ErrorCode::UnknownRole),
    }
}

/// Map credential and registration failures to a `400` naming the field.
pub(crate) fn credential_error(err: &CredentialValidationError) -> Error {
    let (field, code) = match err {
        CredentialValidationError::EmptyIdentifier => ("identifier", ErrorCode::Empty),
        CredentialValidationError::EmptyPassword => ("password", ErrorCode::Empty),
        CredentialValidationError::PasswordLength { .. } => {
            ("password", ErrorCode::InvalidPassword)
        }
        CredentialValidationError::Field(inner) => user_field_error(inner),
    };
    ValidationError::new(wire_field(field), err.to_string()).with_code(code)
}

/// Map the competence at `index` of a request body to a `400`.
pub(crate) fn competence_error(index: usize, err: &CompetenceValidationError) -> Error {
    let (field, code) = match err {
        CompetenceValidationError::InvalidTypeId => {
            ("competenceTypeId", ErrorCode::InvalidCompetenceType)
        }
        CompetenceValidationError::InvalidYears { .. } => {
            ("yearsOfExperience", ErrorCode::InvalidYears)
        }
    };
    ValidationError::new(field, err.to_string()).with_index(code, index)
}

/// Map the availability window at `index` of a request body to a `400`.
pub(crate) fn availability_error(index: usize, err: &AvailabilityValidationError) -> Error {
    let (field, code) = match err {
        AvailabilityValidationError::InvalidDate => ("fromDate", ErrorCode::InvalidDate),
        AvailabilityValidationError::InvertedRange { .. } => ("toDate", ErrorCode::InvertedRange),
    };
    ValidationError::new(field, err.to_string()).with_index(code, index)
}

/// Map an unknown application status string to a `400`.
pub(crate) fn status_error(message: impl Into<String>) -> Error {
    ValidationError::new("status", message).with_code(ErrorCode::UnknownStatus)
}
