//! Driving port for submitting and reviewing applications.

use async_trait::async_trait;

use crate::domain::{Application, ApplicationStatus, Caller, Error, UserId};

/// Submit or review the application of `target_owner`.
///
/// Applicants create or refresh their own application; any status they send
/// is ignored. Admins may set any status on any owner's application.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationCommand: Send + Sync {
    async fn submit(
        &self,
        caller: Option<Caller>,
        target_owner: Option<UserId>,
        requested_status: Option<ApplicationStatus>,
    ) -> Result<Application, Error>;
}
