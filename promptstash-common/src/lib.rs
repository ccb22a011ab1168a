//! # PromptStash Common
//!
//! Foundational pieces shared across the PromptStash crates: error severity
//! classification and monotonic ULID generation.

pub mod error;
pub mod ulid_generator;

pub use error::{ErrorSeverity, Severity};
pub use ulid_generator::{generate_monotonic_ulid, generate_monotonic_ulid_string};
