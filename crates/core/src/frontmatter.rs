//! YAML frontmatter splitting for content files
//!
//! A content file opens with a `---` line, carries a YAML mapping, and closes
//! the block with another `---` line. Everything after is the markdown body.

use crate::error::{Error, Result};
use serde_yaml::{Mapping, Value};

const DELIMITER: &str = "---";

/// Untyped content entry: frontmatter fields plus body text
#[derive(Debug, Clone, Default)]
pub struct RawEntry {
    pub fields: Mapping,
    pub body: String,
}

impl RawEntry {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Split a content file into its frontmatter text and body
pub fn split_frontmatter(content: &str) -> Result<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let (first, rest) = match content.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (content, ""),
    };
    if first.trim_end() != DELIMITER {
        return Err(Error::InvalidData(
            "missing frontmatter: file must start with '---'".to_string(),
        ));
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    Err(Error::InvalidData(
        "unterminated frontmatter: no closing '---' line".to_string(),
    ))
}

/// Parse a content file into a [`RawEntry`]
pub fn parse_entry(content: &str) -> Result<RawEntry> {
    let (yaml, body) = split_frontmatter(content)?;

    let fields = match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(map) => map,
        Value::Null => Mapping::new(),
        _ => {
            return Err(Error::InvalidData(
                "frontmatter must be a mapping of field names to values".to_string(),
            ));
        }
    };

    Ok(RawEntry {
        fields,
        body: body.trim_start_matches(['\r', '\n']).to_string(),
    })
}
