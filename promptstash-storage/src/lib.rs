//! # PromptStash Storage
//!
//! Durable prompt persistence over a namespaced key-value backend. Each
//! prompt lives under its own `prompt:<id>` key and a single `prompts_index`
//! key holds the ordered list of ids used to enumerate records.

pub mod error;
pub mod kv;
pub mod store;
pub mod types;

pub use error::{Result, StorageError};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use store::{PromptStore, StorageStats};
pub use types::{NewPrompt, Prompt, PromptId, PromptPatch, Settings, SidebarState};
