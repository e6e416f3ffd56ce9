//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Uniqueness of national id, username and email is left to the database;
//! the violated constraint name tells us which field clashed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Identity, LoginIdentifier, NewIdentity, PasswordHash, StoredIdentity, UserId};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use recruitment::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost")).await?;
    /// let repository = DieselUserRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

/// Field name guarded by a users unique constraint.
fn duplicate_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_national_id_key") => "national_id",
        Some("users_username_key") => "username",
        Some("users_email_key") => "email",
        other => {
            warn!(constraint = ?other, "unrecognised users unique constraint");
            "identity"
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::UniqueViolation { constraint } => {
            UserPersistenceError::duplicate(duplicate_field(constraint.as_deref()))
        }
        DieselFailure::ForeignKeyViolation { .. } => {
            UserPersistenceError::query("foreign key constraint violated")
        }
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

fn row_to_stored(row: UserRow) -> Result<StoredIdentity, UserPersistenceError> {
    row.into_stored()
        .map_err(|message| UserPersistenceError::query(format!("corrupt user row: {message}")))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, identity: &NewIdentity) -> Result<Identity, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *identity.id.as_uuid(),
            name: identity.name.as_ref(),
            surname: identity.surname.as_ref(),
            national_id: identity.national_id.as_ref(),
            username: identity.username.as_ref(),
            email: identity.email.as_ref(),
            password_hash: identity.password_hash.as_str(),
            role: identity.role.as_str(),
        };

        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_stored(stored).map(|stored| stored.identity)
    }

    async fn find_by_login(
        &self,
        login: &LoginIdentifier,
    ) -> Result<Option<StoredIdentity>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = users::table.select(UserRow::as_select()).into_boxed();
        let query = match login {
            LoginIdentifier::Email(email) => query.filter(users::email.eq(email.as_ref())),
            LoginIdentifier::NationalId(national_id) => {
                query.filter(users::national_id.eq(national_id.as_ref()))
            }
            LoginIdentifier::Username(username) => {
                query.filter(users::username.eq(username.as_str()))
            }
        };

        let row: Option<UserRow> = query
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_stored).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Identity>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| row_to_stored(row).map(|stored| stored.identity))
            .transpose()
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        hash: &PasswordHash,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(id.as_uuid()))
            .set(users::password_hash.eq(hash.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
