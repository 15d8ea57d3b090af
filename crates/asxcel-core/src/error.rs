//! Error types for the ASxcel data layer.

use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

/// Error type for every store, entity and migration operation.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The store file could not be opened
    #[error("Cannot open store at '{path}': {source}")]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    /// A statement was malformed or failed while executing
    #[error("Query failed: {message}")]
    QueryFailed {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// A lookup by natural key found no row
    #[error("{entity} '{name}' not found")]
    NotFound { entity: &'static str, name: String },
    /// A migration step could not be applied; the step was rolled back
    #[error("Migration to version {version} failed: {reason}")]
    MigrationFailed { version: i64, reason: String },
    /// A unique key is already taken, or find-or-create could not settle
    #[error("{entity} '{name}' violates a uniqueness constraint")]
    ConstraintViolation { entity: &'static str, name: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// The Model refused an operation that would break an invariant
    #[error("Operation rejected: {reason}")]
    Rejected { reason: String },
    /// An enterprise-scoped operation was called before any enterprise was
    /// activated
    #[error("No enterprise is active")]
    NoActiveEnterprise,
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
}

/// Builder for creating query errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> ModelError {
        ModelError::QueryFailed {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> ModelError {
        ModelError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl ModelError {
    /// Creates a builder for query errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Shorthand for a rejected operation.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// True if this error wraps a SQLite unique/foreign key failure.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::ConstraintViolation { .. } => true,
            Self::QueryFailed { source, .. } => matches!(
                source.sqlite_error_code(),
                Some(ErrorCode::ConstraintViolation)
            ),
            _ => false,
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| ModelError::database(message).with_source(e))
    }
}

/// Extension trait for Results that already carry a [`ModelError`].
pub trait ModelResultExt<T> {
    /// Report a SQLite unique or foreign key failure as a
    /// [`ModelError::ConstraintViolation`] on `entity`.
    fn on_conflict(self, entity: &'static str, name: &str) -> Result<T>;
}

impl<T> ModelResultExt<T> for Result<T> {
    fn on_conflict(self, entity: &'static str, name: &str) -> Result<T> {
        self.map_err(|e| {
            if e.is_constraint_violation() {
                ModelError::ConstraintViolation {
                    entity,
                    name: name.to_string(),
                }
            } else {
                e
            }
        })
    }
}

/// Result type alias for data layer operations
pub type Result<T> = std::result::Result<T, ModelError>;
