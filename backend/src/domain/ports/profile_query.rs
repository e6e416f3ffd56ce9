//! Driving port for reading an applicant's competences and availability.

use async_trait::async_trait;

use crate::domain::{AvailabilityWindow, Caller, Competence, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    async fn competences(
        &self,
        caller: Option<Caller>,
        owner: Option<UserId>,
    ) -> Result<Vec<Competence>, Error>;

    async fn availability(
        &self,
        caller: Option<Caller>,
        owner: Option<UserId>,
    ) -> Result<Vec<AvailabilityWindow>, Error>;
}
