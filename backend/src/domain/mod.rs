//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! layers, together with the services that implement the driving ports.
//! Types validate on construction; invariants and serialisation contracts
//! are documented on each type.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - Identity types (`UserId`, `Role`, `Identity`, ...) and credentials.
//! - Session tokens (`TokenService`, `SessionClaims`, `TokenError`).
//! - The authorization gate (`authorize`, `resolve_owner`).
//! - Profile collections and the reconciliation planner.
//! - Applications and their status machine.

pub mod account_service;
pub mod application;
pub mod application_service;
pub mod auth;
pub mod authorization;
pub mod availability;
pub mod competence;
pub mod error;
pub mod ports;
pub mod profile_service;
pub mod reconciliation;
pub mod session;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::application::{
    Application, ApplicationStatus, ApplicationWrite, UnknownStatus,
};
pub use self::application_service::ApplicationService;
pub use self::auth::{
    CredentialValidationError, LoginCredentials, LoginIdentifier, NewPassword,
    PASSWORD_MAX_BYTES, PASSWORD_MIN_BYTES, Registration, RegistrationInput,
};
pub use self::authorization::{AccessDenied, Caller, authorize, authorize_owner, resolve_owner};
pub use self::availability::{AvailabilityId, AvailabilityValidationError, AvailabilityWindow};
pub use self::competence::{
    Competence, CompetenceTypeId, CompetenceValidationError, MAX_YEARS_OF_EXPERIENCE,
    YearsOfExperience,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::profile_service::ProfileService;
pub use self::reconciliation::{DuplicateKey, Reconcilable, ReconciliationPlan, ensure_unique_keys};
pub use self::session::{
    IssuedToken, SessionClaims, SessionExpired, SessionSubject, TokenError, TokenKind, TokenPair,
    TokenService, TokenTtls,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, Identity, NationalId, NewIdentity, PasswordHash, PersonName, Role,
    StoredIdentity, UserId, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use recruitment::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
