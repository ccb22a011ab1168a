//! Error types for prompt storage operations

use promptstash_common::{ErrorSeverity, Severity};
use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while persisting or loading prompts
#[derive(Debug, Error)]
pub enum StorageError {
    /// Operation targeted an id with no stored record
    #[error("Prompt not found: {id}")]
    NotFound { id: String },

    /// I/O failure in a file-backed key-value store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record or index could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The underlying key-value backend failed
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Prompt data failed validation
    #[error("Invalid prompt data: {0}")]
    InvalidData(String),
}

impl StorageError {
    /// Create a backend error from any message
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create a validation error from any message
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }
}

impl Severity for StorageError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            // Critical: the backend itself is failing
            StorageError::Io(_) => ErrorSeverity::Critical,
            StorageError::Backend(_) => ErrorSeverity::Critical,

            // Error: one operation failed, the store stays usable
            StorageError::NotFound { .. } => ErrorSeverity::Error,
            StorageError::Serialization(_) => ErrorSeverity::Error,

            // Warning: caller-supplied data was rejected
            StorageError::InvalidData(_) => ErrorSeverity::Warning,
        }
    }
}

#[cfg(test)]
mod severity_tests {
    use super::*;

    #[test]
    fn test_backend_failures_are_critical() {
        let io_error = StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(io_error.severity(), ErrorSeverity::Critical);

        let backend = StorageError::backend("quota exceeded");
        assert_eq!(backend.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_operation_failures_are_errors() {
        let not_found = StorageError::NotFound {
            id: "01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string(),
        };
        assert_eq!(not_found.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_validation_failures_are_warnings() {
        let invalid = StorageError::invalid("title cannot be empty");
        assert_eq!(invalid.severity(), ErrorSeverity::Warning);
    }
}
