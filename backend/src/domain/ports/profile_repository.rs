//! Port for competence and availability persistence.
//!
//! Reconciling methods replace an owner's whole set atomically: adapters run
//! the plan and the re-read inside one transaction and serialise concurrent
//! reconciliations for the same owner.

use async_trait::async_trait;

use crate::domain::{AvailabilityWindow, Competence, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
        /// The owner or a referenced catalogue entry does not exist.
        UnknownReference { message: String } => "profile references unknown data: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Stored competences for `owner`, ordered by competence type.
    async fn competences(&self, owner: &UserId) -> Result<Vec<Competence>, ProfileRepositoryError>;

    /// Stored availability windows for `owner`, ordered by start date.
    async fn availability(
        &self,
        owner: &UserId,
    ) -> Result<Vec<AvailabilityWindow>, ProfileRepositoryError>;

    /// Make the stored competences equal `desired` and return the result.
    ///
    /// `desired` has already been checked for duplicate keys.
    async fn reconcile_competences(
        &self,
        owner: &UserId,
        desired: Vec<Competence>,
    ) -> Result<Vec<Competence>, ProfileRepositoryError>;

    /// Make the stored availability equal `desired` and return the result.
    async fn reconcile_availability(
        &self,
        owner: &UserId,
        desired: Vec<AvailabilityWindow>,
    ) -> Result<Vec<AvailabilityWindow>, ProfileRepositoryError>;
}

/// Fixture implementation that stores nothing and echoes desired sets.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileRepository;

#[async_trait]
impl ProfileRepository for FixtureProfileRepository {
    async fn competences(&self, _owner: &UserId) -> Result<Vec<Competence>, ProfileRepositoryError> {
        Ok(Vec::new())
    }

    async fn availability(
        &self,
        _owner: &UserId,
    ) -> Result<Vec<AvailabilityWindow>, ProfileRepositoryError> {
        Ok(Vec::new())
    }

    async fn reconcile_competences(
        &self,
        _owner: &UserId,
        desired: Vec<Competence>,
    ) -> Result<Vec<Competence>, ProfileRepositoryError> {
        Ok(desired)
    }

    async fn reconcile_availability(
        &self,
        _owner: &UserId,
        desired: Vec<AvailabilityWindow>,
    ) -> Result<Vec<AvailabilityWindow>, ProfileRepositoryError> {
        Ok(desired)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_echoes_desired_competences() {
        let repo = FixtureProfileRepository;
        let desired = vec![Competence::try_new(3, 1.5).expect("valid")];
        let stored = repo
            .reconcile_competences(&UserId::random(), desired.clone())
            .await
            .expect("fixture reconcile");
        assert_eq!(stored, desired);
    }
}
