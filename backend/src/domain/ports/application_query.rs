//! Driving port for reading an application.

use async_trait::async_trait;

use crate::domain::{Application, Caller, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationQuery: Send + Sync {
    /// Fetch the owner's application, or `not_found` when none exists.
    async fn fetch(&self, caller: Option<Caller>, owner: Option<UserId>) -> Result<Application, Error>;
}
