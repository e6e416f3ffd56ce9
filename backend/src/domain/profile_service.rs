//! Profile domain service: competences and availability.
//!
//! Implements the profile driving ports. Writes are gated by
//! [`authorize`], validated for duplicate keys, then handed to the
//! repository which reconciles the whole set in one transaction.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{ProfileCommand, ProfileQuery, ProfileRepository, ProfileRepositoryError};
use crate::domain::{
    AvailabilityWindow, Caller, Competence, Error, UserId, authorize, ensure_unique_keys,
};

/// Profile service implementing [`ProfileCommand`] and [`ProfileQuery`].
#[derive(Clone)]
pub struct ProfileService<R> {
    repo: Arc<R>,
}

impl<R> ProfileService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn map_profile_error(error: ProfileRepositoryError) -> Error {
    match error {
        ProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile repository unavailable: {message}"))
        }
        ProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile repository error: {message}"))
        }
        ProfileRepositoryError::UnknownReference { message } => Error::invalid_request(message),
    }
}

fn gate(caller: Option<&Caller>, owner: Option<UserId>) -> Result<UserId, Error> {
    authorize(caller, owner.as_ref())?;
    owner.ok_or_else(|| Error::invalid_request("resource owner is required"))
}

#[async_trait]
impl<R> ProfileCommand for ProfileService<R>
where
    R: ProfileRepository,
{
    async fn save_competences(
        &self,
        caller: Option<Caller>,
        owner: Option<UserId>,
        desired: Vec<Competence>,
    ) -> Result<Vec<Competence>, Error> {
        let owner = gate(caller.as_ref(), owner)?;
        ensure_unique_keys(&desired)?;
        debug!(%owner, count = desired.len(), "reconciling competences");
        self.repo
            .reconcile_competences(&owner, desired)
            .await
            .map_err(map_profile_error)
    }

    async fn save_availability(
        &self,
        caller: Option<Caller>,
        owner: Option<UserId>,
        desired: Vec<AvailabilityWindow>,
    ) -> Result<Vec<AvailabilityWindow>, Error> {
        let owner = gate(caller.as_ref(), owner)?;
        ensure_unique_keys(&desired)?;
        debug!(%owner, count = desired.len(), "reconciling availability");
        self.repo
            .reconcile_availability(&owner, desired)
            .await
            .map_err(map_profile_error)
    }
}

#[async_trait]
impl<R> ProfileQuery for ProfileService<R>
where
    R: ProfileRepository,
{
    async fn competences(
        &self,
        caller: Option<Caller>,
        owner: Option<UserId>,
    ) -> Result<Vec<Competence>, Error> {
        let owner = gate(caller.as_ref(), owner)?;
        self.repo.competences(&owner).await.map_err(map_profile_error)
    }

    async fn availability(
        &self,
        caller: Option<Caller>,
        owner: Option<UserId>,
    ) -> Result<Vec<AvailabilityWindow>, Error> {
        let owner = gate(caller.as_ref(), owner)?;
        self.repo.availability(&owner).await.map_err(map_profile_error)
    }
}
