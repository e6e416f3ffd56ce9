//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! each suite pulls this module in with `mod support;` and uses the subset
//! it needs.

#![allow(dead_code, reason = "each suite uses a different subset of helpers")]

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{TestDatabase, test_database};

use recruitment::domain::{
    EmailAddress, NationalId, NewIdentity, PasswordHash, PersonName, Role, UserId, Username,
};

/// Render a `postgres` error with enough detail to be useful in CI logs.
///
/// The `postgres::Error` `Display` implementation often collapses database
/// errors to a generic `db error`, which hides the message and SQLSTATE.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );

    if let Some(constraint) = db_error.constraint() {
        summary.push_str("; constraint: ");
        summary.push_str(constraint);
    }

    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }

    summary
}

/// Insert payload whose unique columns are derived from `serial`.
///
/// `serial` must be four digits so the national id stays well formed.
pub fn sample_identity(serial: &str) -> NewIdentity {
    NewIdentity {
        id: UserId::random(),
        name: PersonName::for_field("name", "Ada").expect("valid name"),
        surname: PersonName::for_field("surname", "Lovelace").expect("valid surname"),
        national_id: NationalId::new(format!("19900115-{serial}")).expect("valid national id"),
        username: Username::new(format!("ada{serial}")).expect("valid username"),
        email: EmailAddress::new(format!("ada{serial}@example.com")).expect("valid email"),
        password_hash: PasswordHash::new("fixture$correct horse"),
        role: Role::Applicant,
    }
}
