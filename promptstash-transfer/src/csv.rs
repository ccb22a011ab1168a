//! CSV export and import
//!
//! The column set is fixed and matches the historical export format,
//! including the localized header. Every exported field is double-quoted
//! with `""` escaping; embedded newlines are encoded as the two-character
//! sequence `\n` so a record always occupies exactly one line, and the file
//! starts with a UTF-8 BOM so spreadsheet tools render non-ASCII text.

use crate::error::{Result, TransferError};
use chrono::{DateTime, Utc};
use promptstash_storage::{Prompt, PromptId};
use tracing::debug;

/// Header row of the stable column set: id, title, content, tags,
/// created-at, pinned.
pub const CSV_HEADER: &str = "ID,标题,内容,标签,创建时间,是否置顶";

const BOM: &str = "\u{feff}";
const FIELD_COUNT: usize = 6;
const TAG_SEPARATOR: char = ';';

/// Serialize prompts to CSV, one quoted record per line
pub fn export_csv(prompts: &[Prompt]) -> String {
    let mut out = String::with_capacity(64 * (prompts.len() + 1));
    out.push_str(BOM);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for prompt in prompts {
        let fields = [
            prompt.id.as_str().to_string(),
            prompt.title.clone(),
            prompt.content.clone(),
            prompt.tags.join(&TAG_SEPARATOR.to_string()),
            prompt.created_at.to_rfc3339(),
            prompt.is_pinned.to_string(),
        ];
        let encoded: Vec<String> = fields.iter().map(|f| encode_field(f)).collect();
        out.push_str(&encoded.join(","));
        out.push('\n');
    }

    out
}

/// Parse CSV produced by [`export_csv`] (or a spreadsheet edit of it).
///
/// The first line is skipped only when it looks like a header, so a
/// headerless file keeps its first record. Blank lines are ignored, and any
/// malformed row fails the whole batch with its 1-based row number (the
/// header, when present, is row 1).
pub fn parse_csv(input: &str) -> Result<Vec<Prompt>> {
    let input = input.strip_prefix(BOM).unwrap_or(input);
    let mut lines = input.lines().enumerate().peekable();

    match lines.peek() {
        None => return Err(TransferError::UnknownFormat("empty CSV input".to_string())),
        Some((_, first)) if is_header_row(first) => {
            lines.next();
        }
        Some(_) => {}
    }

    let mut prompts = Vec::new();
    for (offset, line) in lines {
        let row = offset + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_row(line);
        if fields.len() < FIELD_COUNT {
            return Err(TransferError::csv_row(
                row,
                format!("expected {FIELD_COUNT} fields, found {}", fields.len()),
            ));
        }

        let title = decode_field(&fields[1]);
        if title.trim().is_empty() {
            return Err(TransferError::csv_row(row, "title cannot be empty"));
        }
        let content = decode_field(&fields[2]);
        if content.trim().is_empty() {
            return Err(TransferError::csv_row(row, "content cannot be empty"));
        }

        let id = if fields[0].trim().is_empty() {
            PromptId::generate()
        } else {
            PromptId::new(fields[0].trim())
        };

        let tags: Vec<String> = decode_field(&fields[3])
            .split(TAG_SEPARATOR)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let created_at = parse_timestamp(&fields[4], row)?;
        let is_pinned = parse_pin_flag(&fields[5], row)?;

        prompts.push(Prompt {
            id,
            title,
            content,
            tags,
            is_pinned,
            created_at,
            updated_at: created_at,
            is_deleted: false,
            deleted_at: None,
        });
    }

    debug!(count = prompts.len(), "parsed CSV prompt import");
    Ok(prompts)
}

/// A header row starts with the literal `ID` column, optionally re-quoted
/// by a spreadsheet round-trip. Data rows carry a ULID or timestamp there.
fn is_header_row(line: &str) -> bool {
    let line = line.trim();
    line == CSV_HEADER || line.starts_with("ID,") || line.starts_with("\"ID\",")
}

fn encode_field(raw: &str) -> String {
    let escaped = raw
        .replace('"', "\"\"")
        .replace("\r\n", "\n")
        .replace('\n', "\\n");
    format!("\"{escaped}\"")
}

fn decode_field(raw: &str) -> String {
    // Quote unescaping happens during the split; only newlines remain
    raw.replace("\\n", "\n")
}

fn parse_timestamp(raw: &str, row: usize) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Utc::now());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TransferError::csv_row(row, format!("invalid timestamp '{raw}': {e}")))
}

fn parse_pin_flag(raw: &str, row: usize) -> Result<bool> {
    match raw.trim() {
        "" | "false" | "0" | "否" => Ok(false),
        "true" | "1" | "是" => Ok(true),
        other => Err(TransferError::csv_row(
            row,
            format!("invalid pin flag '{other}'"),
        )),
    }
}

/// Split one record line into fields, honoring double-quoted fields with
/// `""` escapes. Unquoted commas separate fields.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn awkward_prompt() -> Prompt {
        let created = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Prompt {
            id: PromptId::new("01ARZ3NDEKTSV4RRFFQ69G5FAV"),
            title: "Quotes \"inside\", and commas".to_string(),
            content: "line one\nline two, with comma\nsay \"hi\"".to_string(),
            tags: vec!["dev".to_string(), "多语言".to_string()],
            is_pinned: true,
            created_at: created,
            updated_at: created,
            is_deleted: false,
            deleted_at: None,
        }
    }

    #[test]
    fn test_export_starts_with_bom_and_header() {
        let csv = export_csv(&[awkward_prompt()]);
        assert!(csv.starts_with('\u{feff}'));
        assert!(csv[3..].starts_with(CSV_HEADER));
        // One record occupies exactly one line despite embedded newlines
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_csv_roundtrip_preserves_awkward_fields() {
        let original = awkward_prompt();
        let parsed = parse_csv(&export_csv(&[original.clone()])).unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, original.id);
        assert_eq!(parsed[0].title, original.title);
        assert_eq!(parsed[0].content, original.content);
        assert_eq!(parsed[0].tags, original.tags);
        assert_eq!(parsed[0].created_at, original.created_at);
        assert!(parsed[0].is_pinned);
    }

    #[test]
    fn test_short_row_fails_with_row_number() {
        let input = format!("{CSV_HEADER}\n\"id\",\"title\",\"content\"\n");
        let err = parse_csv(&input).unwrap_err();
        match err {
            TransferError::CsvRow { row, reason } => {
                assert_eq!(row, 2);
                assert!(reason.contains("expected 6 fields"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_lines_are_skipped_and_ids_generated() {
        let input = format!("{CSV_HEADER}\n\n\"\",\"T\",\"C\",\"a;b\",\"\",\"否\"\n");
        let parsed = parse_csv(&input).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(!parsed[0].id.as_str().is_empty());
        assert_eq!(parsed[0].tags, vec!["a".to_string(), "b".to_string()]);
        assert!(!parsed[0].is_pinned);
    }

    #[test]
    fn test_invalid_timestamp_and_pin_flag_are_row_indexed() {
        let bad_time = format!("{CSV_HEADER}\n\"\",\"T\",\"C\",\"\",\"yesterday\",\"false\"\n");
        assert!(matches!(
            parse_csv(&bad_time),
            Err(TransferError::CsvRow { row: 2, .. })
        ));

        let bad_pin = format!("{CSV_HEADER}\n\"\",\"T\",\"C\",\"\",\"\",\"maybe\"\n");
        assert!(matches!(
            parse_csv(&bad_pin),
            Err(TransferError::CsvRow { row: 2, .. })
        ));
    }

    #[test]
    fn test_tag_with_embedded_newline_roundtrips() {
        let mut prompt = awkward_prompt();
        prompt.tags = vec!["multi\nline".to_string(), "plain".to_string()];

        let parsed = parse_csv(&export_csv(&[prompt.clone()])).unwrap();
        assert_eq!(parsed[0].tags, prompt.tags);
    }

    #[test]
    fn test_headerless_input_keeps_first_record() {
        let input = "\"\",\"First\",\"C1\",\"\",\"\",\"false\"\n\"\",\"Second\",\"C2\",\"\",\"\",\"true\"\n";
        let parsed = parse_csv(input).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title, "First");

        // Without a header the first line is row 1 in error reports
        let err = parse_csv("\"\",\"T\",\"C\",\"\",\"\",\"maybe\"\n").unwrap_err();
        assert!(matches!(err, TransferError::CsvRow { row: 1, .. }));
    }

    #[test]
    fn test_empty_input_is_unknown_format() {
        assert!(matches!(
            parse_csv(""),
            Err(TransferError::UnknownFormat(_))
        ));
    }
}
