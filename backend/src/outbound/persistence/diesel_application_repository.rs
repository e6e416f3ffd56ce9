//! PostgreSQL-backed `ApplicationRepository` implementation using Diesel ORM.
//!
//! Writes are a single `INSERT ... ON CONFLICT (owner_id) DO UPDATE`, so the
//! create-or-refresh decision is made by the database under the primary key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ApplicationRepository, ApplicationRepositoryError};
use crate::domain::{Application, ApplicationWrite, UserId};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error, map_basic_pool_error};
use super::models::{ApplicationRow, NewApplicationRow};
use super::pool::{DbPool, PoolError};
use super::schema::applications;

/// Diesel-backed implementation of the application repository port.
#[derive(Clone)]
pub struct DieselApplicationRepository {
    pool: DbPool,
}

impl DieselApplicationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ApplicationRepositoryError {
    map_basic_pool_error(error, ApplicationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ApplicationRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => ApplicationRepositoryError::connection(message),
        DieselFailure::ForeignKeyViolation { .. } => ApplicationRepositoryError::unknown_owner(),
        DieselFailure::UniqueViolation { .. } => {
            ApplicationRepositoryError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => ApplicationRepositoryError::query(message),
    }
}

fn row_to_application(row: ApplicationRow) -> Result<Application, ApplicationRepositoryError> {
    Application::try_from(row).map_err(|message| {
        ApplicationRepositoryError::query(format!("corrupt application row: {message}"))
    })
}

#[async_trait]
impl ApplicationRepository for DieselApplicationRepository {
    async fn find(&self, owner: &UserId) -> Result<Option<Application>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ApplicationRow> = applications::table
            .find(owner.as_uuid())
            .select(ApplicationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_application).transpose()
    }

    async fn upsert(
        &self,
        owner: &UserId,
        write: ApplicationWrite,
        now: DateTime<Utc>,
    ) -> Result<Application, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewApplicationRow {
            owner_id: *owner.as_uuid(),
            status: write.initial_status().as_str(),
            created_at: now,
            updated_at: now,
        };
        let insert = diesel::insert_into(applications::table)
            .values(&row)
            .on_conflict(applications::owner_id)
            .do_update();

        let stored: ApplicationRow = match write {
            ApplicationWrite::Touch => {
                insert
                    .set(applications::updated_at.eq(excluded(applications::updated_at)))
                    .returning(ApplicationRow::as_returning())
                    .get_result(&mut conn)
                    .await
            }
            ApplicationWrite::SetStatus(_) => {
                insert
                    .set((
                        applications::status.eq(excluded(applications::status)),
                        applications::updated_at.eq(excluded(applications::updated_at)),
                    ))
                    .returning(ApplicationRow::as_returning())
                    .get_result(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;
        row_to_application(stored)
    }
}
