//! Error types for the data-loader crate.
//!
//! Covers both loading the JSON dataset from disk and answering queries
//! through the [`MovieStore`](crate::store::MovieStore) interface.

use thiserror::Error;

/// Errors that can occur while loading, validating or querying movie data
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A dataset file was not valid JSON for the expected record type
    #[error("Parse error in {file}: {reason}")]
    ParseError { file: String, reason: String },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Referenced entity doesn't exist (e.g., rating for non-existent movie)
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: u32 },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// The backing store could not answer a query
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
