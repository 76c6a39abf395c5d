//! Common error types for DHA
//!
//! Only structural problems are errors: a table that cannot be loaded, a
//! required column that is not there, a rule set that makes no sense.
//! Row-level defects never show up here; they are findings in the report.

use thiserror::Error;

/// Common result type for DHA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Structural error types shared by the engine and its adapters
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// One or more required source files are not present
    #[error("Missing files in {folder}: {}", files.join(", "))]
    MissingFiles {
        /// Folder that was searched
        folder: String,
        /// File names that were not found
        files: Vec<String>,
    },

    /// A source table lacks required columns
    #[error("Table '{table}' is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// Table name (e.g. "items")
        table: String,
        /// Column headers that were not found
        columns: Vec<String>,
    },

    /// A source table has no header row at all
    #[error("Table '{0}' is empty (no header row)")]
    EmptyTable(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller passed something unusable (e.g. a data folder that is a file)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
