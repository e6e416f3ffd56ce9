//! Driving port for authentication and account use-cases.
//!
//! Inbound adapters call this port to log in, refresh sessions, register and
//! reset passwords without knowing how identities are stored or hashed.

use async_trait::async_trait;

use crate::domain::{
    Caller, Error, Identity, IssuedToken, LoginCredentials, NewPassword, Registration, TokenPair,
    UserId,
};

/// Successful login: both tokens and the authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub tokens: TokenPair,
    pub user: Identity,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and mint an access/refresh pair.
    ///
    /// Unknown identifiers and wrong passwords are indistinguishable.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error>;

    /// Exchange a refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<IssuedToken, Error>;

    /// Register a new applicant identity.
    async fn register(&self, registration: Registration) -> Result<Identity, Error>;

    /// Replace the password of `owner`; allowed for the owner or an admin.
    async fn reset_password(
        &self,
        caller: Option<Caller>,
        owner: Option<UserId>,
        password: NewPassword,
    ) -> Result<(), Error>;
}
