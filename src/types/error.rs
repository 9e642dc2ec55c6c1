//! Error types for the settlement reconciler
//!
//! This module defines every error that can occur while ingesting and reconciling
//! the two feeds.
//!
//! # Error Categories
//!
//! - **Ingestion Errors**: file not found, unsupported format, oversized file,
//!   workbook or CSV decoding failures
//! - **Schema Errors**: a sheet lacks the rows/columns/headers its feed layout requires
//! - **Row Errors**: a single row cannot be normalized (missing key, bad rate)
//!
//! Ingestion and schema errors are fatal to a run. Row errors are collected into the
//! excluded-rows list and reconciliation continues without the offending row.

use super::record::Feed;
use thiserror::Error;

/// Main error type for the reconciler
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileError {
    /// Input file not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error while reading input or writing output
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// Input file extension is neither a spreadsheet nor CSV
    #[error("Unsupported file format: {path} (expected .xlsx, .xlsm, .xls, .ods or .csv)")]
    UnsupportedFormat {
        /// The rejected path
        path: String,
    },

    /// Input file exceeds the ingestion size limit
    #[error("File too large: {path} is {size} bytes (limit {limit})")]
    FileTooLarge {
        /// The rejected path
        path: String,
        /// Actual file size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// The spreadsheet container could not be decoded
    #[error("Workbook error: {message}")]
    Workbook {
        /// Description of the decoding failure
        message: String,
    },

    /// CSV input could not be parsed or output could not be written
    #[error("CSV error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Csv {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the CSV error
        message: String,
    },

    /// A sheet does not match its feed's fixed layout
    ///
    /// Fatal: no partial output is produced.
    #[error("Schema error in {feed} sheet: {message}")]
    Schema {
        /// Feed whose sheet is malformed
        feed: Feed,
        /// What is missing
        message: String,
    },

    /// A settlement row's USD amount cannot be computed
    ///
    /// Non-fatal: the row is excluded and reported.
    #[error("Computation error at settlement row {row}: {message}")]
    Computation {
        /// 1-based sheet row
        row: usize,
        /// Why the amount could not be derived
        message: String,
    },

    /// A row has no usable partner PIN
    ///
    /// Non-fatal: the row is excluded and reported.
    #[error("Missing partner PIN at {feed} row {row}")]
    MissingKey {
        /// Feed the row belongs to
        feed: Feed,
        /// 1-based sheet row
        row: usize,
    },

    /// A background normalization task did not complete
    #[error("Normalization task failed: {message}")]
    TaskFailed {
        /// Join error description
        message: String,
    },
}

impl From<std::io::Error> for ReconcileError {
    fn from(error: std::io::Error) -> Self {
        ReconcileError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ReconcileError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ReconcileError::Csv {
            line,
            message: error.to_string(),
        }
    }
}

impl From<calamine::Error> for ReconcileError {
    fn from(error: calamine::Error) -> Self {
        ReconcileError::Workbook {
            message: error.to_string(),
        }
    }
}

impl ReconcileError {
    /// Create a Schema error
    pub fn schema(feed: Feed, message: &str) -> Self {
        ReconcileError::Schema {
            feed,
            message: message.to_string(),
        }
    }

    /// Create a Computation error
    pub fn computation(row: usize, message: &str) -> Self {
        ReconcileError::Computation {
            row,
            message: message.to_string(),
        }
    }

    /// Create a MissingKey error
    pub fn missing_key(feed: Feed, row: usize) -> Self {
        ReconcileError::MissingKey { feed, row }
    }

    /// Whether the error aborts the whole run
    ///
    /// Row-level errors (`Computation`, `MissingKey`) are not fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ReconcileError::Computation { .. } | ReconcileError::MissingKey { .. }
        )
    }
}
