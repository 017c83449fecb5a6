//! Shared helpers for Diesel repository implementations.
//!
//! Every adapter maps pool failures to its port's `Connection` variant and
//! Diesel failures to its `Query` variant; the closure-based helpers here
//! keep that mapping in one place. The cast helpers bridge the database's
//! signed integer columns and the domain's unsigned quantities.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool error into a repository-specific connection error.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// `NotFound` and query-builder failures become query errors; only a closed
/// connection maps to the connection variant. Details are logged at debug
/// level rather than leaked into the error message.
pub(crate) fn map_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// Cast a database quantity (i32) to the domain's u32.
///
/// Quantities are strictly positive, enforced by a database check
/// constraint.
#[expect(
    clippy::cast_sign_loss,
    reason = "quantity is positive by database constraint"
)]
pub(crate) fn cast_quantity(quantity: i32) -> u32 {
    quantity as u32
}

/// Cast a domain quantity (u32) to the database's i32.
#[expect(
    clippy::cast_possible_wrap,
    reason = "order quantities are far below the i32 ceiling"
)]
pub(crate) fn cast_quantity_for_db(quantity: u32) -> i32 {
    quantity as i32
}
