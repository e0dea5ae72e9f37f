//! Shared Diesel error mapping for the persistence adapters.
//!
//! Every adapter maps failures into one of three buckets: the connection was
//! unusable, a constraint rejected the write, or the statement failed for some
//! other reason. Each port error type supplies its own constructors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(super) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }
}

fn is_constraint_violation(kind: &DatabaseErrorKind) -> bool {
    matches!(
        kind,
        DatabaseErrorKind::UniqueViolation
            | DatabaseErrorKind::ForeignKeyViolation
            | DatabaseErrorKind::CheckViolation
            | DatabaseErrorKind::NotNullViolation
    )
}

fn classify<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => connection("database connection error"),
        _ => query("database error"),
    }
}

/// Map Diesel errors for adapters without a constraint variant.
///
/// Constraint violations fall into the query bucket.
pub(super) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    log_diesel_error(&error);
    classify(error, query, connection)
}

/// Map Diesel errors, routing uniqueness, foreign-key, check, and not-null
/// violations to `constraint` with the violated constraint's name.
pub(super) fn map_constrained_diesel_error<E, Q, C, K>(
    error: DieselError,
    query: Q,
    connection: C,
    constraint: K,
) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
    K: FnOnce(String) -> E,
{
    log_diesel_error(&error);
    match error {
        DieselError::DatabaseError(kind, info) if is_constraint_violation(&kind) => {
            constraint(
                info.constraint_name()
                    .map_or_else(|| info.message().to_owned(), str::to_owned),
            )
        }
        other => classify(other, query, connection),
    }
}
