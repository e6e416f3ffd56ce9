//! Bcrypt adapter for the `PasswordHasher` port.
//!
//! Bcrypt is CPU bound, so both hashing and verification run on Tokio's
//! blocking pool instead of an actix worker.

use async_trait::async_trait;
use bcrypt::BcryptError;
use tokio::task;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{NewPassword, PasswordHash};

/// Salted bcrypt hashing with a configurable cost factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Lowest cost bcrypt accepts; only suitable for tests.
    pub const MIN_COST: u32 = 4;

    /// Create a hasher with the given cost.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHasherError::Backend`] when `cost` is outside the
    /// range bcrypt supports.
    pub fn new(cost: u32) -> Result<Self, PasswordHasherError> {
        if !(Self::MIN_COST..=31).contains(&cost) {
            return Err(PasswordHasherError::backend(format!(
                "bcrypt cost must be between {} and 31, got {cost}",
                Self::MIN_COST
            )));
        }
        Ok(Self { cost })
    }

    pub const fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

fn map_bcrypt_error(error: BcryptError) -> PasswordHasherError {
    match error {
        BcryptError::InvalidHash(_) | BcryptError::InvalidPrefix(_) => {
            PasswordHasherError::malformed_hash()
        }
        other => PasswordHasherError::backend(other.to_string()),
    }
}

fn map_join_error(error: &task::JoinError) -> PasswordHasherError {
    PasswordHasherError::backend(format!("hashing task failed: {error}"))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &NewPassword) -> Result<PasswordHash, PasswordHasherError> {
        let cost = self.cost;
        let plaintext = Zeroizing::new(password.expose().to_owned());
        task::spawn_blocking(move || bcrypt::hash(plaintext.as_bytes(), cost))
            .await
            .map_err(|err| map_join_error(&err))?
            .map(PasswordHash::new)
            .map_err(map_bcrypt_error)
    }

    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let plaintext = Zeroizing::new(password.to_owned());
        let stored = hash.as_str().to_owned();
        task::spawn_blocking(move || bcrypt::verify(plaintext.as_bytes(), &stored))
            .await
            .map_err(|err| map_join_error(&err))?
            .map_err(map_bcrypt_error)
    }
}

#[cfg(test)]
mod tests {
    //! Hashing behaviour at the minimum cost to keep the suite quick.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> BcryptPasswordHasher {
        BcryptPasswordHasher::new(BcryptPasswordHasher::MIN_COST).expect("valid cost")
    }

    fn password(raw: &str) -> NewPassword {
        NewPassword::new(raw).expect("valid password")
    }

    #[rstest]
    #[tokio::test]
    async fn verifies_only_the_original_password(hasher: BcryptPasswordHasher) {
        let hash = hasher.hash(&password("correct horse")).await.expect("hash");
        assert!(hasher.verify("correct horse", &hash).await.expect("verify"));
        assert!(!hasher.verify("wrong horse!", &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_are_salted(hasher: BcryptPasswordHasher) {
        let first = hasher.hash(&password("correct horse")).await.expect("hash");
        let second = hasher.hash(&password("correct horse")).await.expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_hash_is_reported(hasher: BcryptPasswordHasher) {
        let err = hasher
            .verify("correct horse", &PasswordHash::new("fixture$correct horse"))
            .await
            .expect_err("not bcrypt");
        assert_eq!(err, PasswordHasherError::MalformedHash);
    }

    #[rstest]
    #[case(3)]
    #[case(32)]
    fn out_of_range_cost_is_rejected(#[case] cost: u32) {
        assert!(BcryptPasswordHasher::new(cost).is_err());
    }
}
