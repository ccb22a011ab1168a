//! JSON export and import
//!
//! Export wraps the prompt list in a versioned envelope. Import accepts
//! either the envelope or a bare prompt array, validates every item, and
//! rejects the whole batch on the first malformed one.

use crate::error::{Result, TransferError};
use chrono::{DateTime, Utc};
use promptstash_storage::{Prompt, PromptId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Version stamped into the export envelope
pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportEnvelope {
    prompts: Vec<Prompt>,
    exported_at: DateTime<Utc>,
    version: String,
}

/// Incoming item with every field optional except what validation requires.
///
/// Hand-written exports routinely carry only `title` and `content`; ids and
/// timestamps are filled in here, and the record store still re-keys any id
/// that collides with an existing record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    is_pinned: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    is_deleted: bool,
    #[serde(default)]
    deleted_at: Option<DateTime<Utc>>,
}

impl ImportItem {
    fn into_prompt(self, index: usize) -> Result<Prompt> {
        let title = match self.title {
            Some(t) if !t.trim().is_empty() => t,
            _ => {
                return Err(TransferError::MissingField {
                    index,
                    field: "title",
                })
            }
        };
        let content = match self.content {
            Some(c) if !c.trim().is_empty() => c,
            _ => {
                return Err(TransferError::MissingField {
                    index,
                    field: "content",
                })
            }
        };

        let id = match self.id {
            Some(id) if !id.trim().is_empty() => PromptId::new(id),
            _ => PromptId::generate(),
        };
        let created_at = self.created_at.unwrap_or_else(Utc::now);
        let updated_at = self.updated_at.unwrap_or(created_at).max(created_at);

        Ok(Prompt {
            id,
            title,
            content,
            tags: self.tags,
            is_pinned: self.is_pinned,
            created_at,
            updated_at,
            is_deleted: self.is_deleted,
            deleted_at: self.deleted_at,
        })
    }
}

/// Serialize prompts into the versioned export envelope
pub fn export_json(prompts: &[Prompt]) -> Result<String> {
    let envelope = ExportEnvelope {
        prompts: prompts.to_vec(),
        exported_at: Utc::now(),
        version: EXPORT_VERSION.to_string(),
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Parse an export envelope or a bare prompt array.
///
/// The batch is atomic: any item lacking a non-empty `title` or `content`
/// fails the whole parse with an item-indexed [`TransferError`].
pub fn parse_json(input: &str) -> Result<Vec<Prompt>> {
    let value: serde_json::Value = serde_json::from_str(input)?;

    let items: Vec<ImportItem> = match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)?,
        serde_json::Value::Object(mut obj) => match obj.remove("prompts") {
            Some(prompts) => serde_json::from_value(prompts)?,
            None => {
                return Err(TransferError::UnknownFormat(
                    "object has no 'prompts' field".to_string(),
                ))
            }
        },
        other => {
            return Err(TransferError::UnknownFormat(format!(
                "expected an array or an export envelope, got {other}"
            )))
        }
    };

    let prompts: Vec<Prompt> = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| item.into_prompt(index))
        .collect::<Result<_>>()?;

    debug!(count = prompts.len(), "parsed JSON prompt import");
    Ok(prompts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_prompt() -> Prompt {
        let now = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Prompt {
            id: PromptId::new("01ARZ3NDEKTSV4RRFFQ69G5FAV"),
            title: "Greeting".to_string(),
            content: "Hello {{name}}".to_string(),
            tags: vec!["demo".to_string()],
            is_pinned: true,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        }
    }

    #[test]
    fn test_export_wraps_envelope() {
        let exported = export_json(&[sample_prompt()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&exported).unwrap();

        assert_eq!(value["version"], "1.0");
        assert!(value["exportedAt"].is_string());
        assert_eq!(value["prompts"][0]["title"], "Greeting");
    }

    #[test]
    fn test_parse_accepts_envelope_and_bare_array() {
        let exported = export_json(&[sample_prompt()]).unwrap();
        let from_envelope = parse_json(&exported).unwrap();
        assert_eq!(from_envelope.len(), 1);
        assert_eq!(from_envelope[0], sample_prompt());

        let bare = r#"[{"title":"T","content":"C"}]"#;
        let from_array = parse_json(bare).unwrap();
        assert_eq!(from_array.len(), 1);
        assert_eq!(from_array[0].title, "T");
        assert!(!from_array[0].id.as_str().is_empty());
        assert!(from_array[0].updated_at >= from_array[0].created_at);
    }

    #[test]
    fn test_missing_content_rejects_whole_batch() {
        let input = r#"{"prompts":[{"title":"Ok","content":"fine"},{"title":"T"}]}"#;
        let err = parse_json(input).unwrap_err();
        match err {
            TransferError::MissingField { index, field } => {
                assert_eq!(index, 1);
                assert_eq!(field, "content");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unrecognized_shapes_fail() {
        assert!(matches!(
            parse_json("42"),
            Err(TransferError::UnknownFormat(_))
        ));
        assert!(matches!(
            parse_json(r#"{"items":[]}"#),
            Err(TransferError::UnknownFormat(_))
        ));
        assert!(matches!(parse_json("not json"), Err(TransferError::Json(_))));
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let err = parse_json(r#"[{"title":"   ","content":"C"}]"#).unwrap_err();
        assert!(matches!(
            err,
            TransferError::MissingField { field: "title", .. }
        ));
    }
}
