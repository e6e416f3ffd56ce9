//! Port abstraction for identity persistence adapters and their errors.
//!
//! Uniqueness of username, email and national id is enforced by storage;
//! adapters surface violations as [`UserPersistenceError::Duplicate`] naming
//! the offending field.

use async_trait::async_trait;

use crate::domain::{Identity, LoginIdentifier, NewIdentity, PasswordHash, StoredIdentity, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column already holds the value.
        Duplicate { field: String } => "an identity with this {field} already exists",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new identity. Fails with `Duplicate` on any unique clash.
    async fn create(&self, identity: &NewIdentity) -> Result<Identity, UserPersistenceError>;

    /// Look up an identity and its password hash by login identifier.
    async fn find_by_login(
        &self,
        login: &LoginIdentifier,
    ) -> Result<Option<StoredIdentity>, UserPersistenceError>;

    /// Fetch an identity by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Identity>, UserPersistenceError>;

    /// Replace the stored password hash. Returns `false` when no row matched.
    async fn update_password_hash(
        &self,
        id: &UserId,
        hash: &PasswordHash,
    ) -> Result<bool, UserPersistenceError>;
}

/// Fixture implementation for tests that do not exercise identity storage.
///
/// Lookups find nothing and creation echoes the input back.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn create(&self, identity: &NewIdentity) -> Result<Identity, UserPersistenceError> {
        Ok(identity.to_identity())
    }

    async fn find_by_login(
        &self,
        _login: &LoginIdentifier,
    ) -> Result<Option<StoredIdentity>, UserPersistenceError> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<Identity>, UserPersistenceError> {
        Ok(None)
    }

    async fn update_password_hash(
        &self,
        _id: &UserId,
        _hash: &PasswordHash,
    ) -> Result<bool, UserPersistenceError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_repository_finds_nothing() {
        let repo = FixtureUserRepository;
        let login = LoginIdentifier::detect("ada").expect("username");
        assert!(repo.find_by_login(&login).await.expect("lookup").is_none());
        assert!(repo.find_by_id(&UserId::random()).await.expect("lookup").is_none());
    }

    #[rstest]
    fn duplicate_error_names_field() {
        let err = UserPersistenceError::duplicate("email");
        assert_eq!(err.to_string(), "an identity with this email already exists");
    }
}
