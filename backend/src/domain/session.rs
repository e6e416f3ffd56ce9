//! Stateless session tokens: claims, lifetimes and the token service.
//!
//! Tokens are signed through the [`TokenSigner`] port and never stored.
//! Expiry is judged against the injected [`Clock`] rather than the signer so
//! tests can move time and so an expired token is always reported as
//! [`TokenError::Expired`] instead of a generic failure.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::ports::{TokenSigner, TokenSignerError};
use super::user::{Identity, Role, UserId};
use super::Error;

/// Purpose of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token presented on every request.
    Access,
    /// Longer-lived token exchanged for a new access token.
    Refresh,
}

impl TokenKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

/// Signed claim set carried inside a token.
///
/// Timestamps are Unix seconds, matching the registered JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: UserId,
    pub role: Role,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
    pub kind: TokenKind,
}

impl SessionClaims {
    /// Expiry as a UTC timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Who a token is minted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSubject {
    pub id: UserId,
    pub role: Role,
    pub username: String,
}

impl From<&Identity> for SessionSubject {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            role: identity.role,
            username: identity.username.to_string(),
        }
    }
}

impl From<&SessionClaims> for SessionSubject {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
            username: claims.username.clone(),
        }
    }
}

/// Lifetimes per token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTtls {
    pub access: TimeDelta,
    pub refresh: TimeDelta,
}

impl TokenTtls {
    pub const DEFAULT_ACCESS_SECS: i64 = 15 * 60;
    pub const DEFAULT_REFRESH_SECS: i64 = 60 * 60;

    /// Build lifetimes from whole seconds.
    pub fn from_secs(access: i64, refresh: i64) -> Self {
        Self {
            access: TimeDelta::seconds(access),
            refresh: TimeDelta::seconds(refresh),
        }
    }

    pub const fn for_kind(&self, kind: TokenKind) -> TimeDelta {
        match kind {
            TokenKind::Access => self.access,
            TokenKind::Refresh => self.refresh,
        }
    }
}

impl Default for TokenTtls {
    fn default() -> Self {
        Self::from_secs(Self::DEFAULT_ACCESS_SECS, Self::DEFAULT_REFRESH_SECS)
    }
}

/// Freshly minted token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub kind: TokenKind,
    pub expires_at: DateTime<Utc>,
}

/// Access and refresh token returned by login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signature verified but the expiry instant has passed.
    #[error("token has expired")]
    Expired,
    /// Structure, encoding or signature is not valid.
    #[error("token is malformed")]
    Malformed,
    /// Any other rejection: wrong kind, unknown role, bad subject.
    #[error("token is invalid")]
    Invalid,
}

impl TokenError {
    const fn reason(self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Malformed => "malformed",
            Self::Invalid => "invalid",
        }
    }
}

impl From<TokenError> for Error {
    fn from(value: TokenError) -> Self {
        Error::unauthorized(value.to_string()).with_details(json!({ "reason": value.reason() }))
    }
}

/// Refresh failed for any reason; the client must log in again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("session expired")]
pub struct SessionExpired;

impl From<SessionExpired> for Error {
    fn from(value: SessionExpired) -> Self {
        Error::unauthorized(value.to_string()).with_details(json!({ "reason": "session_expired" }))
    }
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct TokenService {
    signer: Arc<dyn TokenSigner>,
    clock: Arc<dyn Clock>,
    ttls: TokenTtls,
}

impl TokenService {
    /// Create a service signing with `signer` and reading time from `clock`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use mockable::DefaultClock;
    /// use recruitment::domain::{TokenService, TokenTtls};
    /// use recruitment::domain::ports::FixtureTokenSigner;
    ///
    /// let service = TokenService::new(
    ///     Arc::new(FixtureTokenSigner),
    ///     Arc::new(DefaultClock),
    ///     TokenTtls::default(),
    /// );
    /// assert_eq!(service.ttls(), TokenTtls::default());
    /// ```
    pub fn new(signer: Arc<dyn TokenSigner>, clock: Arc<dyn Clock>, ttls: TokenTtls) -> Self {
        Self { signer, clock, ttls }
    }

    pub fn ttls(&self) -> TokenTtls {
        self.ttls
    }

    /// Mint a token of `kind` for `subject`.
    pub fn issue(&self, subject: &SessionSubject, kind: TokenKind) -> Result<IssuedToken, Error> {
        let now = self.clock.utc();
        let expires_at = now + self.ttls.for_kind(kind);
        let claims = SessionClaims {
            sub: subject.id,
            role: subject.role,
            username: subject.username.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            kind,
        };
        let token = self.signer.sign(&claims).map_err(|err| {
            debug!(error = %err, kind = kind.as_str(), "token signing failed");
            Error::internal("failed to issue session token")
        })?;
        Ok(IssuedToken {
            token,
            kind,
            expires_at,
        })
    }

    /// Mint the access and refresh token handed out on login.
    pub fn issue_pair(&self, subject: &SessionSubject) -> Result<TokenPair, Error> {
        Ok(TokenPair {
            access: self.issue(subject, TokenKind::Access)?,
            refresh: self.issue(subject, TokenKind::Refresh)?,
        })
    }

    /// Check signature, expiry and kind of `token`.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<SessionClaims, TokenError> {
        let claims = self.signer.verify(token).map_err(|err| match err {
            TokenSignerError::Malformed { .. } => TokenError::Malformed,
            TokenSignerError::Invalid { .. } | TokenSignerError::Signing { .. } => {
                TokenError::Invalid
            }
        })?;
        if self.clock.utc().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        if claims.kind != expected {
            return Err(TokenError::Invalid);
        }
        Ok(claims)
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Refresh tokens are not rotated. Every failure collapses into
    /// [`SessionExpired`].
    pub fn refresh(&self, refresh_token: &str) -> Result<IssuedToken, SessionExpired> {
        let claims = self.verify(refresh_token, TokenKind::Refresh).map_err(|err| {
            warn!(reason = err.reason(), "refresh token rejected");
            SessionExpired
        })?;
        self.issue(&SessionSubject::from(&claims), TokenKind::Access)
            .map_err(|_| SessionExpired)
    }
}
