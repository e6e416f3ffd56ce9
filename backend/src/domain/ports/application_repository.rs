//! Port for application persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Application, ApplicationWrite, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by application repository adapters.
    pub enum ApplicationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "application repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "application repository query failed: {message}",
        /// The owner does not exist.
        UnknownOwner => "application owner does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Fetch the application owned by `owner`.
    async fn find(&self, owner: &UserId) -> Result<Option<Application>, ApplicationRepositoryError>;

    /// Create or update the owner's application in a single statement.
    async fn upsert(
        &self,
        owner: &UserId,
        write: ApplicationWrite,
        now: DateTime<Utc>,
    ) -> Result<Application, ApplicationRepositoryError>;
}

/// Fixture implementation that never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureApplicationRepository;

#[async_trait]
impl ApplicationRepository for FixtureApplicationRepository {
    async fn find(&self, _owner: &UserId) -> Result<Option<Application>, ApplicationRepositoryError> {
        Ok(None)
    }

    async fn upsert(
        &self,
        owner: &UserId,
        write: ApplicationWrite,
        now: DateTime<Utc>,
    ) -> Result<Application, ApplicationRepositoryError> {
        Ok(write.apply(None, *owner, now))
    }
}
