//! Error types for the catalog crate.
//!
//! Loading distinguishes two kinds of failure:
//! - Fatal: the catalog file itself cannot be read (`CatalogUnavailable`, `Io`, `Csv`)
//! - Local: a single record is malformed (`MalformedItem`); the loader skips it
//!   and keeps going

use thiserror::Error;

/// Errors that can occur while loading the mark catalog and its side files
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// The catalog file is missing or cannot be opened
    #[error("Catalog unavailable: {path}")]
    CatalogUnavailable { path: String },

    /// I/O error occurred while reading or writing a data file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader could not decode the file
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Line in a data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A single catalog record is unusable and was skipped
    #[error("Malformed item {id}: {reason}")]
    MalformedItem { id: String, reason: String },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The attribute vector did not carry exactly six values
    #[error("Expected {expected} attribute values but found {found}")]
    AttributeCount { expected: usize, found: usize },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
