//! Display formatting for entities, collections and operation results.
//!
//! Domain entities implement [`std::fmt::Display`] directly (see
//! [`models`]); the wrappers in this module add context: tables for
//! collections, headlines for create and update results, and one-line
//! status messages. Everything is markdown, rendered by the CLI with
//! termimad or printed as-is.
//!
//! - [`collections`]: [`Airports`], [`Countries`], [`RoutesTable`]
//! - [`results`]: [`CreateResult`], [`UpdateResult`]
//! - [`status`]: [`OperationStatus`]
//! - [`models`]: Display implementations for the entities

pub mod collections;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Airports, Countries, RoutesTable};
pub use results::{CreateResult, UpdateResult};
pub use status::OperationStatus;

/// Escapes the characters that would break a markdown table cell.
pub(crate) fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
