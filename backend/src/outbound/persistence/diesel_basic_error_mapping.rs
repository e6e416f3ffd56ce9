//! Shared Diesel error mapping for the persistence adapters.
//!
//! Every adapter distinguishes the same handful of failure shapes: the pool
//! could not hand out a connection, the connection dropped mid-query, a
//! unique or foreign key constraint fired, or something else went wrong.
//! [`classify_diesel_error`] sorts a Diesel error into one of those shapes so
//! each repository only decides what its own port error looks like.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Failure shape extracted from a Diesel error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection was lost, or the store gave up on a transaction that is
    /// safe to retry (serialisation failure, statement or lock timeout).
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
    /// Any other failure; the message is safe to log but not to expose.
    Query(String),
}

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// PostgreSQL cancellation messages for `statement_timeout` (57014) and
/// `lock_timeout` (55P03); Diesel reports both as `DatabaseErrorKind::Unknown`.
const TIMEOUT_MESSAGES: [&str; 3] = [
    "canceling statement due to statement timeout",
    "canceling statement due to lock timeout",
    "could not obtain lock",
];

fn is_timeout(message: &str) -> bool {
    TIMEOUT_MESSAGES
        .iter()
        .any(|needle| message.contains(needle))
}

/// Sort a Diesel error into a [`DieselFailure`], logging the raw details.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => {
            DieselFailure::Query("database query error".to_owned())
        }
        DieselError::DatabaseError(kind, info) => {
            let constraint = info.constraint_name().map(str::to_owned);
            match kind {
                DatabaseErrorKind::UniqueViolation => DieselFailure::UniqueViolation { constraint },
                DatabaseErrorKind::ForeignKeyViolation => {
                    DieselFailure::ForeignKeyViolation { constraint }
                }
                DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand => {
                    DieselFailure::Connection("database connection error".to_owned())
                }
                DatabaseErrorKind::SerializationFailure => {
                    DieselFailure::Connection("transaction could not be serialised".to_owned())
                }
                _ if is_timeout(info.message()) => {
                    DieselFailure::Connection("database operation timed out".to_owned())
                }
                _ => DieselFailure::Query("database error".to_owned()),
            }
        }
        _ => DieselFailure::Query("database error".to_owned()),
    }
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Constraint violations collapse into query errors; adapters that need to
/// tell them apart call [`classify_diesel_error`] directly.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
{
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => connection(message),
        DieselFailure::Query(message) => query(message),
        DieselFailure::UniqueViolation { .. } => query("unique constraint violated".to_owned()),
        DieselFailure::ForeignKeyViolation { .. } => {
            query("foreign key constraint violated".to_owned())
        }
    }
}
