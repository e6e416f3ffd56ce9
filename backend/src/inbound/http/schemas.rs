//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their domain types but
//! live in the inbound adapter layer where framework concerns belong. Each is
//! registered under the domain type's name, so handlers reference the wrapper
//! (`body = IdentitySchema`) while clients see `Identity`.

#![expect(
    dead_code,
    reason = "Schema wrappers are only read by utoipa's derive output"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The write collides with existing data.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store is temporarily unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "email must be a valid address")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details, e.g. `{"field": "email", "code": "invalid_email"}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Role`].
#[derive(ToSchema)]
#[schema(as = Role)]
pub enum RoleSchema {
    #[schema(rename = "applicant")]
    Applicant,
    #[schema(rename = "admin")]
    Admin,
}

/// OpenAPI schema for [`crate::domain::Identity`].
///
/// Registered user as returned to clients. Never includes the password hash.
#[derive(ToSchema)]
#[schema(as = Identity, rename_all = "camelCase")]
pub struct IdentitySchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "Ada")]
    name: String,
    #[schema(example = "Lovelace")]
    surname: String,
    #[schema(example = "19901215-1234")]
    national_id: String,
    #[schema(example = "ada")]
    username: String,
    #[schema(example = "ada@example.com")]
    email: String,
    role: RoleSchema,
}

/// OpenAPI schema for [`crate::domain::Competence`].
#[derive(ToSchema)]
#[schema(as = Competence, rename_all = "camelCase")]
pub struct CompetenceSchema {
    /// Identifier of the competence in the reference catalogue.
    #[schema(example = 1, minimum = 1)]
    competence_type_id: i32,
    #[schema(example = 3.5, minimum = 0.0)]
    years_of_experience: f64,
}

/// OpenAPI schema for [`crate::domain::AvailabilityWindow`].
#[derive(ToSchema)]
#[schema(as = AvailabilityWindow, rename_all = "camelCase")]
pub struct AvailabilityWindowSchema {
    /// Store-assigned identifier; absent until the window is saved.
    #[schema(example = 17)]
    id: Option<i64>,
    #[schema(example = "2026-06-01", format = Date)]
    from_date: String,
    #[schema(example = "2026-08-31", format = Date)]
    to_date: String,
}

/// OpenAPI schema for [`crate::domain::ApplicationStatus`].
#[derive(ToSchema)]
#[schema(as = ApplicationStatus)]
pub enum ApplicationStatusSchema {
    #[schema(rename = "unhandled")]
    Unhandled,
    #[schema(rename = "accepted")]
    Accepted,
    #[schema(rename = "rejected")]
    Rejected,
}

/// OpenAPI schema for [`crate::domain::Application`].
#[derive(ToSchema)]
#[schema(as = Application, rename_all = "camelCase")]
pub struct ApplicationSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    owner: String,
    status: ApplicationStatusSchema,
    #[schema(format = DateTime)]
    created_at: String,
    #[schema(format = DateTime)]
    updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    fn property_names<T: PartialSchema>() -> Vec<String> {
        let schema = serde_json::to_value(T::schema()).expect("schema serialises to JSON");
        schema
            .get("properties")
            .and_then(serde_json::Value::as_object)
            .map(|properties| properties.keys().cloned().collect())
            .unwrap_or_default()
    }

    #[rstest]
    fn error_schema_uses_wire_field_names() {
        let json = schema_to_json::<ErrorSchema>();
        assert_eq!(ErrorSchema::name(), "Error");
        assert!(json.contains("traceId"));
        assert!(!json.contains("trace_id"));
    }

    #[rstest]
    fn error_code_schema_lists_every_code() {
        let json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(json.contains(code), "missing {code}");
        }
    }

    #[rstest]
    fn identity_schema_omits_password_material() {
        let properties = property_names::<IdentitySchema>();
        assert!(properties.iter().any(|name| name == "nationalId"));
        assert!(
            properties
                .iter()
                .all(|name| !name.to_lowercase().contains("password")),
            "{properties:?}"
        );
    }

    #[rstest]
    fn application_status_schema_is_closed() {
        let json = schema_to_json::<ApplicationStatusSchema>();
        assert!(json.contains("unhandled"));
        assert!(json.contains("accepted"));
        assert!(json.contains("rejected"));
    }
}
