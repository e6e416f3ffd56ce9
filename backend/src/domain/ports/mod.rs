//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`AuthService`, `ProfileCommand`, `ProfileQuery`,
//! `ApplicationCommand`, `ApplicationQuery`) are called by inbound adapters.
//! Driven ports (repositories, `PasswordHasher`, `TokenSigner`) are
//! implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod application_command;
mod application_query;
mod application_repository;
mod auth_service;
mod password_hasher;
mod profile_command;
mod profile_query;
mod profile_repository;
mod token_signer;
mod user_repository;

#[cfg(test)]
pub use application_command::MockApplicationCommand;
pub use application_command::ApplicationCommand;
#[cfg(test)]
pub use application_query::MockApplicationQuery;
pub use application_query::ApplicationQuery;
#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::{
    ApplicationRepository, ApplicationRepositoryError, FixtureApplicationRepository,
};
#[cfg(test)]
pub use auth_service::MockAuthService;
pub use auth_service::{AuthService, LoginOutcome};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_command::ProfileCommand;
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::ProfileQuery;
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{FixtureProfileRepository, ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use token_signer::MockTokenSigner;
pub use token_signer::{FixtureTokenSigner, TokenSigner, TokenSignerError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};
