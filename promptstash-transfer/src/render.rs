//! Presentation-only exports: Markdown and HTML
//!
//! One section per prompt, no import path. Soft-deleted prompts are the
//! caller's concern; these renderers emit exactly what they are given.

use promptstash_storage::Prompt;

/// Render prompts as a Markdown document, one section per prompt
pub fn export_markdown(prompts: &[Prompt]) -> String {
    let mut sections = Vec::with_capacity(prompts.len());

    for prompt in prompts {
        let mut section = String::new();
        section.push_str(&format!("## {}", prompt.title));
        if prompt.is_pinned {
            section.push_str(" 📌");
        }
        section.push_str("\n\n");
        section.push_str(&prompt.content);
        section.push('\n');

        if !prompt.tags.is_empty() {
            section.push_str(&format!("\n*Tags: {}*\n", prompt.tags.join(", ")));
        }
        section.push_str(&format!(
            "\n*Created: {}*\n",
            prompt.created_at.format("%Y-%m-%d %H:%M")
        ));

        sections.push(section);
    }

    format!("# Prompts\n\n{}", sections.join("\n---\n\n"))
}

/// Render prompts as a standalone HTML document
pub fn export_html(prompts: &[Prompt]) -> String {
    let mut body = String::new();

    for prompt in prompts {
        body.push_str("  <article class=\"prompt\">\n");
        body.push_str(&format!(
            "    <h2>{}{}</h2>\n",
            escape_html(&prompt.title),
            if prompt.is_pinned { " 📌" } else { "" }
        ));
        body.push_str(&format!(
            "    <pre>{}</pre>\n",
            escape_html(&prompt.content)
        ));
        if !prompt.tags.is_empty() {
            body.push_str("    <ul class=\"tags\">\n");
            for tag in &prompt.tags {
                body.push_str(&format!("      <li>{}</li>\n", escape_html(tag)));
            }
            body.push_str("    </ul>\n");
        }
        body.push_str(&format!(
            "    <time>{}</time>\n",
            prompt.created_at.format("%Y-%m-%d %H:%M")
        ));
        body.push_str("  </article>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Prompts</title>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use promptstash_storage::PromptId;

    fn sample() -> Prompt {
        let now = Utc::now();
        Prompt {
            id: PromptId::new("01ARZ3NDEKTSV4RRFFQ69G5FAV"),
            title: "Review <PR>".to_string(),
            content: "Check diff & comment".to_string(),
            tags: vec!["dev".to_string()],
            is_pinned: true,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        }
    }

    #[test]
    fn test_markdown_contains_all_fields() {
        let md = export_markdown(&[sample()]);
        assert!(md.starts_with("# Prompts"));
        assert!(md.contains("## Review <PR> 📌"));
        assert!(md.contains("Check diff & comment"));
        assert!(md.contains("*Tags: dev*"));
    }

    #[test]
    fn test_html_escapes_markup() {
        let html = export_html(&[sample()]);
        assert!(html.contains("Review &lt;PR&gt;"));
        assert!(html.contains("Check diff &amp; comment"));
        assert!(!html.contains("<PR>"));
    }

    #[test]
    fn test_empty_export_is_still_a_document() {
        let md = export_markdown(&[]);
        assert!(md.starts_with("# Prompts"));

        let html = export_html(&[]);
        assert!(html.contains("<!DOCTYPE html>"));
    }
}
