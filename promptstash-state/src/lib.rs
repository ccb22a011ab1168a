//! # PromptStash State
//!
//! The mutation cache: a synchronous-feeling read model over the
//! asynchronous prompt record store, with per-operation reconciliation.

pub mod cache;

pub use cache::PromptCache;
