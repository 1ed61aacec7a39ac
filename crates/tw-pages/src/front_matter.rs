//! YAML front matter splitting.
//!
//! A front matter block starts on the first line with `---` and ends at the
//! next line consisting of `---`:
//!
//! ```text
//! ---
//! name: Setup
//! description: Getting a workstation ready
//! ---
//! Body text starts here.
//! ```
//!
//! Documents without an opening delimiter, or whose block is never closed,
//! have no front matter and are returned unchanged.

use serde_json::{Map, Value};

/// Front matter delimiter line.
const DELIMITER: &str = "---";

/// Error returned when a front matter block cannot be decoded.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    /// The block is not valid YAML.
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The block is valid YAML but not a key/value mapping.
    #[error("Front matter must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// True if `line` (without its line terminator) is a delimiter line.
fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches('\r').trim_end() == DELIMITER
}

/// Locate the front matter block.
///
/// Returns the raw YAML and the body that follows the closing delimiter.
fn split(raw: &str) -> Option<(&str, &str)> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let (first_line, rest) = text.split_once('\n')?;
    if !is_delimiter(first_line) {
        return None;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_delimiter(line.trim_end_matches('\n')) {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

/// Name of a YAML value kind for error messages.
fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Split a Markdown document into its front matter mapping and body.
///
/// Without a front matter block the mapping is empty and the body is the
/// whole input. An empty block (or one holding only comments) yields an
/// empty mapping.
///
/// # Errors
///
/// Returns `FrontMatterError` if the block is not valid YAML or does not
/// decode to a mapping with string keys.
pub fn parse(raw: &str) -> Result<(Map<String, Value>, &str), FrontMatterError> {
    let Some((yaml, body)) = split(raw) else {
        return Ok((Map::new(), raw));
    };

    if yaml.trim().is_empty() {
        return Ok((Map::new(), body));
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Object(map) => Ok((map, body)),
        Value::Null => Ok((Map::new(), body)),
        other => Err(FrontMatterError::NotAMapping(kind_name(&other))),
    }
}
