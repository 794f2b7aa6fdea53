//! Per-document error taxonomy
//!
//! Every variant is scoped to a single document: the dispatch boundary
//! converts these into a `Failed` outcome and the run moves on to the
//! remaining documents.

use thiserror::Error;

/// Errors that can occur while resolving or dispatching one document
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Missing target in '{file}'")]
    MissingTarget { file: String },

    #[error("Unknown file type '{file}'")]
    UnknownFileType { file: String },

    #[error("{message} in {file}")]
    Parse { file: String, message: String },

    #[error("Request to <{url}> failed: {message}")]
    Request { url: String, message: String },
}

impl ImportError {
    /// Transport-level failure (connection refused, timeout, invalid URL)
    pub fn transport(url: &str, err: &reqwest::Error) -> Self {
        Self::Request {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    /// Remote rejected the request with a non-2xx status
    pub fn remote(url: &str, status: reqwest::StatusCode, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {}: {}", status, body)
        };
        Self::Request {
            url: url.to_string(),
            message,
        }
    }
}
