//! Error severity classification for PromptStash
//!
//! Every error enum in the workspace implements [`Severity`] so callers can
//! pick logging levels and user-facing presentation consistently.

/// Severity levels for error classification
///
/// - **Warning**: potential issue but the operation can proceed.
/// - **Error**: the operation failed but the system can continue.
/// - **Critical**: the system cannot continue and requires attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,

    /// Operation failed but system can continue
    Error,

    /// System cannot continue, requires immediate attention
    Critical,
}

/// Trait for error types that have severity levels
///
/// # Example
///
/// ```rust
/// use promptstash_common::{ErrorSeverity, Severity};
///
/// #[derive(Debug)]
/// enum MyError {
///     BackendUnavailable,
///     RecordMissing,
/// }
///
/// impl Severity for MyError {
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             MyError::BackendUnavailable => ErrorSeverity::Critical,
///             MyError::RecordMissing => ErrorSeverity::Error,
///         }
///     }
/// }
///
/// assert_eq!(MyError::RecordMissing.severity(), ErrorSeverity::Error);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}
