//! Database gateway and SQLite management.
//!
//! This module owns the single connection to the store file and exposes the
//! two primitives everything else is built on: [`Database::query`], which
//! snapshots rows into a detached [`QueryResult`], and [`Database::update`],
//! which returns the affected row count. Schema upgrades live in
//! [`migrations`].

use std::path::{Path, PathBuf};

use rusqlite::{Connection, Params};

use crate::error::{DatabaseResultExt, ModelError, Result};

mod meta;
pub mod migrations;
pub mod result;

pub use migrations::{BackfillPolicy, UpdateManager, CURRENT_VERSION};
pub use result::QueryResult;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
    path: PathBuf,
}

impl Database {
    /// Opens (or creates) the store file.
    ///
    /// No schema is touched here; run the [`UpdateManager`] before handing
    /// the connection to anything else.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let connection = Connection::open(&path).map_err(|source| ModelError::StoreUnavailable {
            path: path.clone(),
            source,
        })?;

        connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        Ok(Self { connection, path })
    }

    /// Location of the store file, used for migration backups.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Executes a read and snapshots every row.
    pub fn query<P: Params>(&self, sql: &str, params: P) -> Result<QueryResult> {
        let mut stmt = self
            .connection
            .prepare(sql)
            .db_context("Failed to prepare query")?;
        let columns = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        let rows = stmt.query(params).db_context("Failed to execute query")?;

        QueryResult::from_rows(columns, rows)
    }

    /// Executes a write and returns the number of affected rows (0 for DDL).
    pub fn update<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        self.connection
            .execute(sql, params)
            .db_context("Failed to execute update")
    }

    /// Executes several parameterless statements in one go.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.connection
            .execute_batch(sql)
            .db_context("Failed to execute batch")
    }

    /// Row id generated by the most recent successful insert.
    pub fn last_insert_id(&self) -> i64 {
        self.connection.last_insert_rowid()
    }

    /// Runs `f` inside a transaction: committed if `f` succeeds, rolled back
    /// if it returns an error.
    pub fn in_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>,
    {
        let tx = self
            .connection
            .unchecked_transaction()
            .db_context("Failed to begin transaction")?;

        // Dropping `tx` without committing rolls back.
        let value = f(self)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(value)
    }

    /// Releases the connection. Consumes the gateway so it cannot be closed
    /// twice.
    pub fn close(self) -> Result<()> {
        self.connection
            .close()
            .map_err(|(_, e)| ModelError::database("Failed to close database").with_source(e))
    }
}
