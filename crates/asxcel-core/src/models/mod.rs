//! Domain entities: countries, airports, enterprises and routes.
//!
//! Every entity mirrors exactly one row. There are two ways to obtain one:
//!
//! 1. **Sync** by natural key (`Country::sync`, `Airport::sync`,
//!    `Route::sync`): look the row up and insert it only if it is missing,
//!    then read it back once to pick up generated values.
//! 2. **Bulk** from an already fetched [`QueryResult`] row
//!    (`from_result`), used when a parent loads many rows with one query.
//!
//! Setters take the [`Database`](crate::db::Database) they persist through
//! and only touch the in-memory value after the write succeeded.
//!
//! Entities compare by natural key: countries and airports by name, routes
//! by origin name and then destination name. Display implementations live in
//! [`crate::display::models`].

use log::debug;

use crate::{
    db::QueryResult,
    error::{ModelError, Result},
};

pub mod airport;
pub mod country;
pub mod enterprise;
pub mod route;


pub use airport::Airport;
pub use country::Country;
pub use enterprise::Enterprise;
pub use route::Route;

/// Upper bound of the passenger and cargo scales.
pub const MAX_DEMAND: u8 = 10;

/// Looks a row up and, if it is missing, inserts it and looks again once.
///
/// A second miss means something else is holding the key (or the insert
/// silently did nothing) and is reported as a constraint violation rather
/// than retried.
pub(crate) fn find_or_create<T, F, I>(
    entity: &'static str,
    key: &str,
    find: F,
    insert: I,
) -> Result<T>
where
    F: Fn() -> Result<Option<T>>,
    I: FnOnce() -> Result<usize>,
{
    if let Some(found) = find()? {
        return Ok(found);
    }

    debug!("Inserting {entity} '{key}'");
    match insert() {
        Ok(_) => {}
        // Someone else holds the key; the second lookup decides.
        Err(e) if e.is_constraint_violation() => {}
        Err(e) => return Err(e),
    }

    find()?.ok_or_else(|| ModelError::ConstraintViolation {
        entity,
        name: key.to_string(),
    })
}

/// Reads a mandatory integer column of the current row.
pub(crate) fn required_i64(result: &QueryResult, column: &str) -> Result<i64> {
    result
        .get_i64_by_name(column)
        .ok_or_else(|| ModelError::invalid_input(column).with_reason("missing in result row"))
}

/// Reads a mandatory text column of the current row.
pub(crate) fn required_text(result: &QueryResult, column: &str) -> Result<String> {
    result
        .get_by_name(column)
        .map(String::from)
        .ok_or_else(|| ModelError::invalid_input(column).with_reason("missing in result row"))
}

/// Rejects blank names before they reach the store.
pub(crate) fn validate_name(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        Err(ModelError::invalid_input(field).with_reason("must not be empty"))
    } else {
        Ok(())
    }
}

/// Turns an `UPDATE ... WHERE id = ?` row count into an error if the row is
/// gone.
pub(crate) fn expect_updated(updated: usize, entity: &'static str, name: &str) -> Result<()> {
    if updated == 0 {
        Err(ModelError::NotFound {
            entity,
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}
