//! Driving port for replacing an applicant's competences and availability.

use async_trait::async_trait;

use crate::domain::{AvailabilityWindow, Caller, Competence, Error, UserId};

/// Replace an owner's profile collections with a desired set.
///
/// Each call validates the desired set, checks the caller may act on the
/// owner, then reconciles storage atomically and returns the stored result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    async fn save_competences(
        &self,
        caller: Option<Caller>,
        owner: Option<UserId>,
        desired: Vec<Competence>,
    ) -> Result<Vec<Competence>, Error>;

    async fn save_availability(
        &self,
        caller: Option<Caller>,
        owner: Option<UserId>,
        desired: Vec<AvailabilityWindow>,
    ) -> Result<Vec<AvailabilityWindow>, Error>;
}
