//! PostgreSQL-backed `ProfileRepository` implementation using Diesel ORM.
//!
//! Each reconciliation runs in one transaction. The owner's `users` row is
//! locked with `SELECT ... FOR UPDATE` before the current set is read, so two
//! reconciliations for the same owner queue behind each other and the loser
//! plans against the winner's committed state.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{
    AvailabilityWindow, Competence, DuplicateKey, Reconcilable, ReconciliationPlan, UserId,
};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error, map_basic_pool_error};
use super::models::{AvailabilityRow, CompetenceRow, NewAvailabilityRow, NewCompetenceRow};
use super::pool::{DbPool, PoolError};
use super::schema::{availability, competence_profiles, users};

/// Diesel-backed implementation of the profile repository port.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure raised inside a reconciliation transaction.
#[derive(Debug)]
enum ReconcileError {
    Database(diesel::result::Error),
    UnknownOwner,
    Duplicate(DuplicateKey),
    CorruptRow(String),
}

impl From<diesel::result::Error> for ReconcileError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Database(value)
    }
}

fn map_pool_error(error: PoolError) -> ProfileRepositoryError {
    map_basic_pool_error(error, ProfileRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ProfileRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => ProfileRepositoryError::connection(message),
        DieselFailure::ForeignKeyViolation { constraint } => match constraint.as_deref() {
            Some("competence_profiles_competence_type_id_fkey") => {
                ProfileRepositoryError::unknown_reference("unknown competence type")
            }
            Some(name) if name.ends_with("owner_id_fkey") => {
                ProfileRepositoryError::unknown_reference("profile owner does not exist")
            }
            other => {
                warn!(constraint = ?other, "unrecognised profile foreign key violation");
                ProfileRepositoryError::unknown_reference("referenced record does not exist")
            }
        },
        DieselFailure::UniqueViolation { .. } => {
            ProfileRepositoryError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => ProfileRepositoryError::query(message),
    }
}

fn map_reconcile_error(error: ReconcileError) -> ProfileRepositoryError {
    match error {
        ReconcileError::Database(err) => map_diesel_error(err),
        ReconcileError::UnknownOwner => {
            ProfileRepositoryError::unknown_reference("profile owner does not exist")
        }
        ReconcileError::Duplicate(err) => ProfileRepositoryError::query(err.to_string()),
        ReconcileError::CorruptRow(message) => {
            ProfileRepositoryError::query(format!("corrupt profile row: {message}"))
        }
    }
}

fn decode_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, String>
where
    T: TryFrom<R, Error = String>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// Lock the owner's identity row for the rest of the transaction.
async fn lock_owner(conn: &mut AsyncPgConnection, owner: Uuid) -> Result<(), ReconcileError> {
    users::table
        .find(owner)
        .select(users::id)
        .for_update()
        .first::<Uuid>(conn)
        .await
        .optional()?
        .map(drop)
        .ok_or(ReconcileError::UnknownOwner)
}

async fn load_competences(
    conn: &mut AsyncPgConnection,
    owner: Uuid,
) -> Result<Vec<Competence>, ReconcileError> {
    let rows: Vec<CompetenceRow> = competence_profiles::table
        .filter(competence_profiles::owner_id.eq(owner))
        .order(competence_profiles::competence_type_id.asc())
        .select(CompetenceRow::as_select())
        .load(conn)
        .await?;
    decode_rows(rows).map_err(ReconcileError::CorruptRow)
}

async fn load_availability(
    conn: &mut AsyncPgConnection,
    owner: Uuid,
) -> Result<Vec<AvailabilityWindow>, ReconcileError> {
    let rows: Vec<AvailabilityRow> = availability::table
        .filter(availability::owner_id.eq(owner))
        .order((availability::from_date.asc(), availability::to_date.asc()))
        .select(AvailabilityRow::as_select())
        .load(conn)
        .await?;
    decode_rows(rows).map_err(ReconcileError::CorruptRow)
}

async fn apply_competence_plan(
    conn: &mut AsyncPgConnection,
    owner: Uuid,
    plan: ReconciliationPlan<Competence>,
) -> Result<(), ReconcileError> {
    if !plan.to_delete.is_empty() {
        let type_ids: Vec<i32> = plan.to_delete.into_iter().map(i32::from).collect();
        diesel::delete(
            competence_profiles::table
                .filter(competence_profiles::owner_id.eq(owner))
                .filter(competence_profiles::competence_type_id.eq_any(type_ids)),
        )
        .execute(conn)
        .await?;
    }

    let rows: Vec<NewCompetenceRow> = plan
        .to_upsert
        .into_iter()
        .chain(plan.to_insert)
        .map(|competence| NewCompetenceRow {
            owner_id: owner,
            competence_type_id: competence.competence_type_id.get(),
            years_of_experience: competence.years_of_experience.get(),
        })
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(competence_profiles::table)
            .values(&rows)
            .on_conflict((
                competence_profiles::owner_id,
                competence_profiles::competence_type_id,
            ))
            .do_update()
            .set(
                competence_profiles::years_of_experience
                    .eq(excluded(competence_profiles::years_of_experience)),
            )
            .execute(conn)
            .await?;
    }
    Ok(())
}

async fn apply_availability_plan(
    conn: &mut AsyncPgConnection,
    owner: Uuid,
    current: &[AvailabilityWindow],
    plan: ReconciliationPlan<AvailabilityWindow>,
) -> Result<(), ReconcileError> {
    let doomed_ids: Vec<i64> = current
        .iter()
        .filter(|window| plan.to_delete.contains(&window.natural_key()))
        .filter_map(|window| window.id().map(|id| id.get()))
        .collect();
    if !doomed_ids.is_empty() {
        diesel::delete(
            availability::table
                .filter(availability::owner_id.eq(owner))
                .filter(availability::id.eq_any(doomed_ids)),
        )
        .execute(conn)
        .await?;
    }

    // Dates are the whole key, so writing an identified window and inserting
    // a fresh one are the same conflict-tolerant insert.
    let rows: Vec<NewAvailabilityRow> = plan
        .to_upsert
        .into_iter()
        .chain(plan.to_insert)
        .map(|window| NewAvailabilityRow {
            owner_id: owner,
            from_date: window.from_date(),
            to_date: window.to_date(),
        })
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(availability::table)
            .values(&rows)
            .on_conflict((
                availability::owner_id,
                availability::from_date,
                availability::to_date,
            ))
            .do_nothing()
            .execute(conn)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn competences(&self, owner: &UserId) -> Result<Vec<Competence>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_competences(&mut conn, *owner.as_uuid())
            .await
            .map_err(map_reconcile_error)
    }

    async fn availability(
        &self,
        owner: &UserId,
    ) -> Result<Vec<AvailabilityWindow>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_availability(&mut conn, *owner.as_uuid())
            .await
            .map_err(map_reconcile_error)
    }

    async fn reconcile_competences(
        &self,
        owner: &UserId,
        desired: Vec<Competence>,
    ) -> Result<Vec<Competence>, ProfileRepositoryError> {
        let owner = *owner.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                lock_owner(conn, owner).await?;
                let current = load_competences(conn, owner).await?;
                let plan = ReconciliationPlan::compute(&current, desired)
                    .map_err(ReconcileError::Duplicate)?;
                debug!(
                    %owner,
                    deletes = plan.to_delete.len(),
                    upserts = plan.to_upsert.len(),
                    "applying competence plan"
                );
                apply_competence_plan(conn, owner, plan).await?;
                load_competences(conn, owner).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_reconcile_error)
    }

    async fn reconcile_availability(
        &self,
        owner: &UserId,
        desired: Vec<AvailabilityWindow>,
    ) -> Result<Vec<AvailabilityWindow>, ProfileRepositoryError> {
        let owner = *owner.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                lock_owner(conn, owner).await?;
                let current = load_availability(conn, owner).await?;
                let plan = ReconciliationPlan::compute(&current, desired)
                    .map_err(ReconcileError::Duplicate)?;
                debug!(
                    %owner,
                    deletes = plan.to_delete.len(),
                    upserts = plan.to_upsert.len(),
                    inserts = plan.to_insert.len(),
                    "applying availability plan"
                );
                apply_availability_plan(conn, owner, &current, plan).await?;
                load_availability(conn, owner).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_reconcile_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for profile repository error mapping.
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    fn missing_owner_is_an_unknown_reference() {
        let err = map_reconcile_error(ReconcileError::UnknownOwner);
        assert!(matches!(err, ProfileRepositoryError::UnknownReference { .. }));
    }

    #[rstest]
    fn foreign_key_violation_is_an_unknown_reference() {
        let err = map_reconcile_error(ReconcileError::Database(DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("violates foreign key constraint".to_owned()),
        )));
        assert!(matches!(err, ProfileRepositoryError::UnknownReference { .. }));
    }

    #[rstest]
    #[case(DatabaseErrorKind::ClosedConnection, "server closed the connection")]
    #[case(DatabaseErrorKind::SerializationFailure, "could not serialize access")]
    #[case(DatabaseErrorKind::Unknown, "canceling statement due to lock timeout")]
    fn retryable_failures_are_connection_errors(
        #[case] kind: DatabaseErrorKind,
        #[case] message: &str,
    ) {
        let err = map_reconcile_error(ReconcileError::Database(DieselError::DatabaseError(
            kind,
            Box::new(message.to_owned()),
        )));
        assert!(matches!(err, ProfileRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn corrupt_rows_are_query_errors() {
        let err = map_reconcile_error(ReconcileError::CorruptRow("years out of range".into()));
        assert!(err.to_string().contains("years out of range"));
    }
}
