//! Error types for import/export operations

use promptstash_common::{ErrorSeverity, Severity};
use thiserror::Error;

/// Result type for transfer operations
pub type Result<T> = std::result::Result<T, TransferError>;

/// Errors raised while parsing or serializing prompt collections.
///
/// A parse failure rejects the entire batch: no prompt from a malformed
/// payload is ever partially imported.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Payload shape matched neither supported import format
    #[error("Unrecognized import payload: {0}")]
    UnknownFormat(String),

    /// Payload is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An imported item lacks a required field
    #[error("Prompt {index}: missing or empty field '{field}'")]
    MissingField { index: usize, field: &'static str },

    /// A CSV row could not be parsed; `row` is 1-based and counts the header
    #[error("CSV row {row}: {reason}")]
    CsvRow { row: usize, reason: String },
}

impl TransferError {
    /// Create a row-indexed CSV error
    pub fn csv_row(row: usize, reason: impl Into<String>) -> Self {
        Self::CsvRow {
            row,
            reason: reason.into(),
        }
    }
}

impl Severity for TransferError {
    fn severity(&self) -> ErrorSeverity {
        // All transfer failures reject one import attempt; the store and the
        // rest of the system keep working.
        match self {
            TransferError::UnknownFormat(_) => ErrorSeverity::Error,
            TransferError::Json(_) => ErrorSeverity::Error,
            TransferError::MissingField { .. } => ErrorSeverity::Error,
            TransferError::CsvRow { .. } => ErrorSeverity::Error,
        }
    }
}
