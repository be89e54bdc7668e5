//! Store error types
//!
//! Defines all errors that can occur in the data store layer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening, verifying or querying the store
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The database file could not be opened
    #[error("Failed to open store {path:?}: {error}")]
    Open { path: PathBuf, error: String },

    /// A table the query layer depends on is absent
    #[error("Missing table: {0}")]
    MissingTable(String),

    /// A table exists but lacks a required column
    #[error("Missing column {column} in table {table}")]
    MissingColumn { table: String, column: String },

    /// SQLite reported an error while executing a statement
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Refusing to build over an existing file
    #[error("{0:?} already exists; remove it first to rebuild")]
    AlreadyExists(PathBuf),

    /// A CSV row could not be read or converted
    #[error("Import error: {0}")]
    Import(String),

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        StoreError::Import(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
