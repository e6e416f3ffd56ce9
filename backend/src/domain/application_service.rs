//! Application domain service: submission and review.
//!
//! Applicants may only create or refresh their own application. A status
//! supplied by a non-admin is ignored and logged; only admins change status.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    ApplicationCommand, ApplicationQuery, ApplicationRepository, ApplicationRepositoryError,
};
use crate::domain::{
    AccessDenied, Application, ApplicationStatus, ApplicationWrite, Caller, Error, UserId,
    authorize,
};

/// Application service implementing [`ApplicationCommand`] and
/// [`ApplicationQuery`].
#[derive(Clone)]
pub struct ApplicationService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ApplicationService<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

fn map_application_error(error: ApplicationRepositoryError) -> Error {
    match error {
        ApplicationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("application repository unavailable: {message}"))
        }
        ApplicationRepositoryError::Query { message } => {
            Error::internal(format!("application repository error: {message}"))
        }
        ApplicationRepositoryError::UnknownOwner => {
            Error::not_found("application owner does not exist")
        }
    }
}

impl<R> ApplicationService<R>
where
    R: ApplicationRepository,
{
    /// Decide what the caller is allowed to write.
    fn plan_write(caller: &Caller, requested: Option<ApplicationStatus>) -> ApplicationWrite {
        match requested {
            Some(status) if caller.is_admin() => ApplicationWrite::SetStatus(status),
            Some(status) => {
                warn!(
                    caller = %caller.id,
                    requested = status.as_str(),
                    "ignoring application status supplied by non-admin caller"
                );
                ApplicationWrite::Touch
            }
            None => ApplicationWrite::Touch,
        }
    }
}

#[async_trait]
impl<R> ApplicationCommand for ApplicationService<R>
where
    R: ApplicationRepository,
{
    async fn submit(
        &self,
        caller: Option<Caller>,
        target_owner: Option<UserId>,
        requested_status: Option<ApplicationStatus>,
    ) -> Result<Application, Error> {
        authorize(caller.as_ref(), target_owner.as_ref())?;
        let caller = caller.ok_or(AccessDenied::Unauthenticated)?;
        let owner = target_owner.ok_or(AccessDenied::MissingOwner)?;

        let write = Self::plan_write(&caller, requested_status);
        let application = self
            .repo
            .upsert(&owner, write, self.clock.utc())
            .await
            .map_err(map_application_error)?;
        info!(
            %owner,
            caller = %caller.id,
            status = application.status.as_str(),
            "application saved"
        );
        Ok(application)
    }
}

#[async_trait]
impl<R> ApplicationQuery for ApplicationService<R>
where
    R: ApplicationRepository,
{
    async fn fetch(&self, caller: Option<Caller>, owner: Option<UserId>) -> Result<Application, Error> {
        authorize(caller.as_ref(), owner.as_ref())?;
        let owner = owner.ok_or(AccessDenied::MissingOwner)?;
        self.repo
            .find(&owner)
            .await
            .map_err(map_application_error)?
            .ok_or_else(|| Error::not_found(format!("no application for user {owner}")))
    }
}
