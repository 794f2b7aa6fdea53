//! Request resolution
//!
//! Turns one parsed document plus the run configuration into the concrete
//! request the dispatcher executes: absolute target URL, decoded payload,
//! and an optional verified upload path.

use std::path::PathBuf;

use crate::config::ImportConfig;
use crate::decode::decode_body;
use crate::error::ImportError;
use crate::frontmatter::ImportDocument;

/// A fully resolved request, consumed exactly once by the dispatcher
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    /// Document identifier carried through to the outcome
    pub file: String,
    /// Absolute target URL (`host + target`)
    pub target_url: String,
    /// Decoded body payload
    pub payload: serde_json::Value,
    /// Companion upload file, already checked for existence
    pub upload: Option<PathBuf>,
}

/// Resolve a document into a request.
///
/// The host-rewrite substitution happens on the raw body text before
/// decoding, so string values inside the payload pick up the replacement.
pub fn resolve(doc: &ImportDocument, config: &ImportConfig) -> Result<ResolvedRequest, ImportError> {
    let target = doc
        .target()
        .ok_or_else(|| ImportError::MissingTarget { file: doc.id() })?;

    let target_url = format!("{}{}", config.host, target);

    let body = if config.rewrite_host.is_empty() {
        doc.body.clone()
    } else {
        doc.body.replace(&config.rewrite_host, &config.rewrite_to)
    };
    let payload = decode_body(&body, &doc.path)?;

    Ok(ResolvedRequest {
        file: doc.id(),
        target_url,
        payload,
        upload: resolve_upload(doc),
    })
}

/// Resolve the optional `file` header to an absolute-enough local path.
///
/// A missing file is not an error: the document falls back to a plain JSON
/// upsert, the same as if no `file` key was present.
fn resolve_upload(doc: &ImportDocument) -> Option<PathBuf> {
    let name = doc.upload_file()?;

    let joined = format!("{}/{}", doc.dir().display(), name).replace("//", "/");
    let path = PathBuf::from(joined);

    if path.is_file() {
        Some(path)
    } else {
        tracing::debug!(
            "Upload file '{}' referenced by {} not found, sending plain request",
            path.display(),
            doc.id()
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_REWRITE_HOST;

    fn doc(path: &str, contents: &str) -> ImportDocument {
        ImportDocument::parse(path, contents).unwrap()
    }

    #[test]
    fn test_resolve_target_url() {
        let config = ImportConfig::new("http://example.com", DEFAULT_REWRITE_HOST, None);
        let doc = doc("a.json", "---\ntarget: /core/app/admin\n---\n{}\n");

        let request = resolve(&doc, &config).unwrap();
        assert_eq!(request.target_url, "http://example.com/core/app/admin");
        assert!(request.upload.is_none());
    }

    #[test]
    fn test_missing_target_is_an_error() {
        let config = ImportConfig::new("http://example.com", DEFAULT_REWRITE_HOST, None);
        let doc = doc("a.json", "---\nowner: ops\n---\n{}\n");

        let err = resolve(&doc, &config).unwrap_err();
        assert!(matches!(err, ImportError::MissingTarget { .. }));
    }

    #[test]
    fn test_body_rewrite_before_decode() {
        let config = ImportConfig::new(
            "http://example.com",
            "http://localhost",
            Some("http://example.com".to_string()),
        );
        let doc = doc(
            "a.json",
            "---\ntarget: /x\n---\n{\"link\": \"see http://localhost/x\"}\n",
        );

        let request = resolve(&doc, &config).unwrap();
        assert_eq!(request.payload["link"], "see http://example.com/x");
    }

    #[test]
    fn test_rewrite_replaces_all_occurrences() {
        let config = ImportConfig::new("http://h", "OLD", Some("NEW".to_string()));
        let doc = doc("a.json", "---\ntarget: /x\n---\n{\"a\": \"OLD\", \"b\": \"OLD OLD\"}\n");

        let request = resolve(&doc, &config).unwrap();
        assert_eq!(request.payload["a"], "NEW");
        assert_eq!(request.payload["b"], "NEW NEW");
    }

    #[test]
    fn test_upload_resolved_when_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.png"), b"\x89PNG").unwrap();
        let doc_path = dir.path().join("logo.yml");

        let config = ImportConfig::new("http://h", DEFAULT_REWRITE_HOST, None);
        let doc = doc(
            doc_path.to_str().unwrap(),
            "---\ntarget: /file/logo\nfile: logo.png\n---\nid: logo\n",
        );

        let request = resolve(&doc, &config).unwrap();
        let upload = request.upload.expect("upload should resolve");
        assert!(upload.ends_with("logo.png"));
        assert!(upload.is_file());
    }

    #[test]
    fn test_missing_upload_degrades_to_plain_request() {
        let dir = tempfile::tempdir().unwrap();
        let doc_path = dir.path().join("logo.yml");

        let config = ImportConfig::new("http://h", DEFAULT_REWRITE_HOST, None);
        let doc = doc(
            doc_path.to_str().unwrap(),
            "---\ntarget: /file/logo\nfile: missing.bin\n---\nid: logo\n",
        );

        let request = resolve(&doc, &config).unwrap();
        assert!(request.upload.is_none());
    }

    #[test]
    fn test_parse_error_propagates() {
        let config = ImportConfig::new("http://h", DEFAULT_REWRITE_HOST, None);
        let doc = doc("a.json", "---\ntarget: /x\n---\n{broken\n");

        let err = resolve(&doc, &config).unwrap_err();
        assert!(matches!(err, ImportError::Parse { .. }));
    }
}
