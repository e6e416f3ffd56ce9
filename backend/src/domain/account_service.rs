//! Account domain service: login, session refresh, registration and
//! password resets.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::domain::ports::{
    AuthService, LoginOutcome, PasswordHasher, PasswordHasherError, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Caller, Error, Identity, IssuedToken, LoginCredentials, NewIdentity, NewPassword,
    PasswordHash, Registration, Role, SessionSubject, TokenService, UserId, authorize,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Hashed once and verified against when the login identifier is unknown.
const DECOY_PASSWORD: &str = "decoy password for unknown identifiers";

/// Account service implementing the [`AuthService`] driving port.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: TokenService,
    decoy: Arc<OnceCell<PasswordHash>>,
}

impl<U, H> AccountService<U, H> {
    /// Create a new service with the given repository, hasher and tokens.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: TokenService) -> Self {
        Self {
            users,
            hasher,
            tokens,
            decoy: Arc::new(OnceCell::new()),
        }
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::Duplicate { field } => {
                Error::conflict(format!("an identity with this {field} already exists"))
                    .with_details(json!({ "field": field, "code": "duplicate" }))
            }
        }
    }

    fn map_hasher_error(error: PasswordHasherError) -> Error {
        Error::internal(format!("password hashing failed: {error}"))
    }

    /// Run a full password verification against a decoy hash so an unknown
    /// identifier costs as much as a wrong password.
    async fn verify_decoy(&self, password: &str) {
        let decoy = self
            .decoy
            .get_or_try_init(|| async {
                let plaintext = NewPassword::new(DECOY_PASSWORD)
                    .map_err(|err| PasswordHasherError::backend(err.to_string()))?;
                self.hasher.hash(&plaintext).await
            })
            .await;
        let outcome = match decoy {
            Ok(hash) => self.hasher.verify(password, hash).await.map(drop),
            Err(err) => Err(err),
        };
        if let Err(err) = outcome {
            warn!(error = %err, "decoy password verification failed");
        }
    }

    fn new_identity(registration: Registration, password_hash: PasswordHash) -> NewIdentity {
        NewIdentity {
            id: UserId::random(),
            name: registration.name,
            surname: registration.surname,
            national_id: registration.national_id,
            username: registration.username,
            email: registration.email,
            password_hash,
            role: Role::Applicant,
        }
    }
}

#[async_trait]
impl<U, H> AuthService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let identifier = credentials.identifier();
        let Some(stored) = self
            .users
            .find_by_login(identifier)
            .await
            .map_err(Self::map_user_error)?
        else {
            self.verify_decoy(credentials.password()).await;
            warn!(kind = identifier.kind(), "login rejected: unknown identifier");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(Self::map_hasher_error)?;
        if !matches {
            warn!(user_id = %stored.identity.id, "login rejected: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let tokens = self
            .tokens
            .issue_pair(&SessionSubject::from(&stored.identity))?;
        info!(user_id = %stored.identity.id, role = %stored.identity.role, "login succeeded");
        Ok(LoginOutcome {
            tokens,
            user: stored.identity,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<IssuedToken, Error> {
        Ok(self.tokens.refresh(refresh_token)?)
    }

    async fn register(&self, registration: Registration) -> Result<Identity, Error> {
        let hash = self
            .hasher
            .hash(&registration.password)
            .await
            .map_err(Self::map_hasher_error)?;
        let identity = self
            .users
            .create(&Self::new_identity(registration, hash))
            .await
            .map_err(Self::map_user_error)?;
        info!(user_id = %identity.id, "identity registered");
        Ok(identity)
    }

    async fn reset_password(
        &self,
        caller: Option<Caller>,
        owner: Option<UserId>,
        password: NewPassword,
    ) -> Result<(), Error> {
        authorize(caller.as_ref(), owner.as_ref())?;
        let owner = owner.ok_or_else(|| Error::invalid_request("resource owner is required"))?;

        let hash = self
            .hasher
            .hash(&password)
            .await
            .map_err(Self::map_hasher_error)?;
        let updated = self
            .users
            .update_password_hash(&owner, &hash)
            .await
            .map_err(Self::map_user_error)?;
        if !updated {
            return Err(Error::not_found(format!("user {owner} not found")));
        }
        info!(user_id = %owner, "password reset");
        Ok(())
    }
}
