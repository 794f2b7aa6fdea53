//! Front matter parsing
//!
//! Import documents carry a leading metadata block delimited by `---` lines,
//! followed by the body to load:
//!
//! ```text
//! ---
//! target: /core/app/admin
//! file: admin-icon.png
//! ---
//! { "id": "admin", ... }
//! ```
//!
//! The header is YAML `key: value` scalars. A document without a front
//! matter block gets an empty header and the full text as body.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ImportError;

/// Header key naming the target resource path (required)
pub const TARGET_KEY: &str = "target";

/// Header key naming an optional companion upload file
pub const FILE_KEY: &str = "file";

/// One discovered document, split into header and body
#[derive(Debug, Clone)]
pub struct ImportDocument {
    /// Source path, used as the document identifier in outcomes and logs
    pub path: PathBuf,
    /// Front matter key/value pairs; non-scalar values are ignored
    pub header: HashMap<String, String>,
    /// Raw body text, not yet rewritten or decoded
    pub body: String,
}

impl ImportDocument {
    /// Split file contents into header map and body.
    pub fn parse(path: impl Into<PathBuf>, contents: &str) -> Result<Self, ImportError> {
        let path = path.into();
        let (header_text, body) = split_front_matter(contents);

        let header = match header_text {
            Some(text) => parse_header(text).map_err(|e| ImportError::Parse {
                file: path.display().to_string(),
                message: format!("Invalid front matter: {}", e),
            })?,
            None => HashMap::new(),
        };

        Ok(Self {
            path,
            header,
            body: body.to_string(),
        })
    }

    /// Document identifier used in outcomes and log lines
    pub fn id(&self) -> String {
        self.path.display().to_string()
    }

    /// Directory the document lives in; upload paths resolve relative to it
    pub fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// The `target` header value, if present and non-empty
    pub fn target(&self) -> Option<&str> {
        self.header.get(TARGET_KEY).map(|s| s.as_str()).filter(|s| !s.is_empty())
    }

    /// The `file` header value, if present
    pub fn upload_file(&self) -> Option<&str> {
        self.header.get(FILE_KEY).map(|s| s.as_str())
    }
}

/// Split contents into `(header_text, body)`. Returns `None` for the header
/// when the document has no front matter block.
fn split_front_matter(contents: &str) -> (Option<&str>, &str) {
    let rest = match strip_delimiter_line(contents) {
        Some(rest) => rest,
        None => return (None, contents),
    };

    // Closing delimiter is the next line consisting of `---`
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let header = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(header), body);
        }
        offset += line.len();
    }

    // Unterminated front matter; treat the whole document as body
    (None, contents)
}

/// Strip a leading `---` line, returning the remainder
fn strip_delimiter_line(contents: &str) -> Option<&str> {
    let mut lines = contents.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end_matches(['\r', '\n']) != "---" {
        return None;
    }
    Some(&contents[first.len()..])
}

/// Parse the header block as a YAML mapping of scalars
fn parse_header(text: &str) -> Result<HashMap<String, String>, serde_yaml::Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(text)?;
    let mut header = HashMap::new();

    if let serde_yaml::Value::Mapping(mapping) = value {
        for (key, value) in mapping {
            let Some(key) = key.as_str() else { continue };
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                _ => continue,
            };
            header.insert(key.to_string(), value);
        }
    }

    Ok(header)
}
