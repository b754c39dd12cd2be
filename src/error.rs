//! Error types for packstat
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// packstat error types
///
/// Malformed trace lines and malformed table rows are never reported through
/// this type: they are dropped and counted where they occur.
#[derive(Error, Debug)]
pub enum Error {
    /// Mandatory result table is absent (analysis cannot proceed)
    #[error("Result table not found: {}\n{remediation}", path.display())]
    MissingTable {
        /// Path that was looked up
        path: PathBuf,
        /// What the user should do to produce the table
        remediation: String,
    },

    /// Result table exists but could not be opened or read
    #[error("Failed to read result table {}: {source}", path.display())]
    TableUnreadable {
        /// Path of the table
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Trace conversion accepted no lines at all
    #[error("No valid tasks read ({rejected} lines rejected)\nCheck the log format (SWF records or `run_time num_procs` per line).")]
    NoValidTasks {
        /// Number of non-comment lines that were rejected
        rejected: usize,
    },

    /// Invalid parameter handed to an operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Arrow batch does not have the result-table layout
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
