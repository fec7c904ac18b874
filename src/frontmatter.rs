//! Frontmatter documents - a YAML metadata block followed by free text
//!
//! ```text
//! ---
//! title: Notes
//! tags: [a, b]
//! ---
//! Body text, kept verbatim.
//! ```
//!
//! Lines before the first `---` marker are ignored. Only one metadata
//! block is allowed per document; a third marker is an error.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Line that opens and closes the metadata block
pub const MARKER: &str = "---";

/// Key that receives the text following the metadata block
pub const DEFAULT_TEXT_FIELD: &str = "_text";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Preamble,
    Metadata,
    Text,
}

/// Parse a document that was read from `path`. The path is used for error
/// reporting only.
pub fn parse_str(path: &Path, content: &str, text_field: &str) -> Result<Map<String, Value>> {
    let mut zone = Zone::Preamble;
    let mut metadata = String::new();
    let mut text = String::new();

    for line in content.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == MARKER {
            zone = match zone {
                Zone::Preamble => Zone::Metadata,
                Zone::Metadata => Zone::Text,
                Zone::Text => {
                    return Err(Error::MalformedDocument {
                        path: path.to_path_buf(),
                        reason: "limited to one frontmatter block per document".to_string(),
                    })
                }
            };
            continue;
        }

        match zone {
            Zone::Preamble => {}
            Zone::Metadata => metadata.push_str(line),
            Zone::Text => text.push_str(line),
        }
    }

    let parsed = if metadata.trim().is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str::<Value>(&metadata)?
    };

    let mut obj = match parsed {
        Value::Object(obj) => obj,
        Value::Null => Map::new(),
        other => {
            return Err(Error::MalformedDocument {
                path: path.to_path_buf(),
                reason: format!("metadata block must be a mapping, found {}", kind_of(&other)),
            })
        }
    };

    obj.insert(text_field.to_string(), Value::String(text));
    Ok(obj)
}

/// Read and parse one frontmatter document
pub fn parse(path: impl AsRef<Path>, text_field: &str) -> Result<Map<String, Value>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "parsing frontmatter document");
    parse_str(path, &content, text_field)
}

/// Parse several documents, one object per path in input order. The first
/// failure aborts the whole batch.
pub fn parse_files(paths: &[PathBuf], text_field: &str) -> Result<Vec<Value>> {
    paths
        .iter()
        .map(|path| parse(path, text_field).map(Value::Object))
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
