//! # PromptStash Transfer
//!
//! Codecs between the stored prompt shape and external file formats: JSON
//! and CSV round-trip for import/export, Markdown and HTML for export only.
//! Parsed batches feed straight into `PromptStore::import_prompts`, which
//! owns the id-collision rules.

pub mod csv;
pub mod error;
pub mod json;
pub mod render;

pub use csv::{export_csv, parse_csv, CSV_HEADER};
pub use error::{Result, TransferError};
pub use json::{export_json, parse_json, EXPORT_VERSION};
pub use render::{export_html, export_markdown};
