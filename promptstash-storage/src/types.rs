//! Core prompt types
//!
//! All types serialize to/from JSON via serde with camelCase field names,
//! matching the persisted key-value record format.

use chrono::{DateTime, Utc};
use promptstash_common::generate_monotonic_ulid_string;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a prompt.
///
/// Freshly generated ids are monotonic ULIDs. Ids carried in from an import
/// may be arbitrary non-empty strings and are preserved as long as they do
/// not collide with an existing record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptId(String);

impl PromptId {
    /// Generate a fresh unique id
    pub fn generate() -> Self {
        Self(generate_monotonic_ulid_string())
    }

    /// Wrap an existing id string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored prompt record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    /// Unique identifier, assigned once at creation
    pub id: PromptId,
    /// Non-empty display title
    pub title: String,
    /// Non-empty body; may contain `{{name}}` placeholders
    pub content: String,
    /// Tags in insertion order; set semantics for membership
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_pinned: bool,
    /// Set once at creation, immutable thereafter
    pub created_at: DateTime<Utc>,
    /// Bumped on every mutation
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; deleted prompts stay recoverable until purged
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Prompt {
    /// Whether the prompt has a tag, compared exactly
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Input for creating a prompt; the store assigns id and timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPrompt {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_pinned: bool,
}

impl NewPrompt {
    /// Create input with a title and content
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            is_pinned: false,
        }
    }

    /// Attach tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Partial update merged into an existing record by `update_prompt`.
///
/// `None` fields are left untouched. `deleted_at` is doubly optional so a
/// patch can distinguish "leave as is" from "clear the marker".
#[derive(Debug, Clone, Default)]
pub struct PromptPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_pinned: Option<bool>,
    pub is_deleted: Option<bool>,
    pub deleted_at: Option<Option<DateTime<Utc>>>,
}

impl PromptPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.is_pinned = Some(pinned);
        self
    }

    pub fn deleted(mut self, deleted: bool) -> Self {
        self.is_deleted = Some(deleted);
        self
    }

    pub fn deleted_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.deleted_at = Some(at);
        self
    }
}

/// Singleton user settings stored under the `settings` key.
///
/// Every field carries a serde default so blobs written by older versions
/// pick up defaults for fields they predate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: String,
    pub language: String,
    pub show_pinned_first: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "system".to_string(),
            language: "en".to_string(),
            show_pinned_first: true,
        }
    }
}

/// Singleton sidebar state stored under the `sidebar` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SidebarState {
    pub open: bool,
    pub width: u32,
    pub active_tag: Option<String>,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self {
            open: false,
            width: 320,
            active_tag: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_serializes_camel_case() {
        let now = Utc::now();
        let prompt = Prompt {
            id: PromptId::new("01ARZ3NDEKTSV4RRFFQ69G5FAV"),
            title: "Greeting".to_string(),
            content: "Hello {{name}}".to_string(),
            tags: vec!["demo".to_string()],
            is_pinned: true,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };

        let json = serde_json::to_string(&prompt).unwrap();
        assert!(json.contains("\"isPinned\":true"));
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("\"deletedAt\""), "None marker is omitted");

        let back: Prompt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prompt);
    }

    #[test]
    fn test_settings_merge_defaults_on_load() {
        // A blob from an older version that only knew about `theme`
        let settings: Settings = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.language, "en");
        assert!(settings.show_pinned_first);
    }

    #[test]
    fn test_sidebar_state_defaults() {
        let state: SidebarState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, SidebarState::default());
        assert_eq!(state.width, 320);
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(PromptId::generate(), PromptId::generate());
    }
}
