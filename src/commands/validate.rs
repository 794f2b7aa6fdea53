//! `validate` command: check documents offline, without any network I/O
//!
//! Runs the same front matter split, target check and body decode as the
//! import path, and reports every file that would fail to dispatch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::decode::decode_body;
use crate::discover::discover_files;
use crate::error::ImportError;
use crate::frontmatter::ImportDocument;

/// Validate every discovered file and return the process exit code.
pub async fn validate(files: Vec<PathBuf>, input_file: Option<PathBuf>) -> Result<i32> {
    let files = discover_files(&files, input_file.as_deref())?;
    info!("Validating {} files", files.len());

    let mut errors: Vec<(String, String)> = Vec::new();
    for path in &files {
        if let Err(e) = validate_file(path) {
            error!("{}: {}", path.display(), e);
            errors.push((path.display().to_string(), e.to_string()));
        }
    }

    if errors.is_empty() {
        info!("Validated {} files, no errors detected", files.len());
        Ok(0)
    } else {
        error!("Validated {} files, {} invalid", files.len(), errors.len());
        Ok(1)
    }
}

/// Check one file the way the import path would consume it.
fn validate_file(path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let doc = ImportDocument::parse(path, &contents)?;

    if doc.target().is_none() {
        return Err(ImportError::MissingTarget { file: doc.id() }.into());
    }

    decode_body(&doc.body, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_valid_file_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.json");
        fs::write(&path, "---\ntarget: /core/app\n---\n{\"id\": \"app\"}\n").unwrap();
        assert!(validate_file(&path).is_ok());
    }

    #[test]
    fn test_missing_target_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-target.json");
        fs::write(&path, "{\"id\": \"app\"}\n").unwrap();
        let err = validate_file(&path).unwrap_err();
        assert!(err.to_string().contains("Missing target"));
    }

    #[test]
    fn test_malformed_body_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "---\ntarget: /x\n---\n{oops\n").unwrap();
        assert!(validate_file(&path).is_err());
    }

    #[tokio::test]
    async fn test_validate_run_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.json"), "---\ntarget: /x\n---\n{}\n").unwrap();
        let code = validate(vec![dir.path().to_path_buf()], None).await.unwrap();
        assert_eq!(code, 0);

        fs::write(dir.path().join("bad.json"), "{no front matter").unwrap();
        let code = validate(vec![dir.path().to_path_buf()], None).await.unwrap();
        assert_eq!(code, 1);
    }
}
