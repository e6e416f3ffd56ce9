//! Port for salted password hashing.
//!
//! Credential checks go through [`PasswordHasher::verify`]; plaintext
//! passwords are never compared directly.

use async_trait::async_trait;

use crate::domain::{NewPassword, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing or verification could not run.
        Backend { message: String } => "password hashing failed: {message}",
        /// The stored hash is not in a recognised format.
        MalformedHash => "stored password hash is malformed",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash for `password`.
    async fn hash(&self, password: &NewPassword) -> Result<PasswordHash, PasswordHasherError>;

    /// Check `password` against a stored hash.
    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}

/// Non-cryptographic hasher for tests: the "hash" is a tagged copy.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

impl FixturePasswordHasher {
    const PREFIX: &'static str = "fixture$";
}

#[async_trait]
impl PasswordHasher for FixturePasswordHasher {
    async fn hash(&self, password: &NewPassword) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(format!("{}{}", Self::PREFIX, password.expose())))
    }

    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let stored = hash
            .as_str()
            .strip_prefix(Self::PREFIX)
            .ok_or_else(PasswordHasherError::malformed_hash)?;
        Ok(stored == password)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_hasher_round_trips() {
        let hasher = FixturePasswordHasher;
        let password = NewPassword::new("correct horse").expect("valid password");
        let hash = hasher.hash(&password).await.expect("hash");
        assert!(hasher.verify("correct horse", &hash).await.expect("verify"));
        assert!(!hasher.verify("wrong horse", &hash).await.expect("verify"));
    }

    #[tokio::test]
    async fn fixture_hasher_rejects_foreign_hashes() {
        let err = FixturePasswordHasher
            .verify("pw", &PasswordHash::new("$2b$04$abc"))
            .await
            .expect_err("foreign hash");
        assert_eq!(err, PasswordHasherError::MalformedHash);
    }
}
