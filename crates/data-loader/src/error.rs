//! Error types for the data-loader crate.
//!
//! Rust error handling concepts demonstrated:
//! - thiserror for defining custom error types
//! - `#[from]` conversions so `?` works on I/O and SQLite errors
//! - Error messages with context

use thiserror::Error;

/// Errors that can occur while importing or querying the local movie index
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Export file could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading the export
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// SQLite reported an error (open, schema, insert or query)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Line in the export couldn't be parsed
    ///
    /// The importer skips these; they only surface from `parse_line` directly.
    #[error("Parse error at line {line}: {reason}")]
    ParseError { line: usize, reason: String },

    /// Import was configured with a value that can't work
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
