//! Request dispatch engine
//!
//! Executes the HTTP protocol for one resolved request:
//!
//! 1. overwrite guard when `--no-overwrite` is set: `GET`, skip on `200`,
//!    write only on `404`, fail on anything else
//! 2. for documents with an upload: existence probe (`GET`), `DELETE` if the
//!    target exists, then a multipart `PUT` with `metadata` and `upload`
//!    fields
//! 3. otherwise a plain JSON `PUT` upsert
//!
//! Every document produces exactly one [`ImportOutcome`]; protocol errors
//! are converted at this boundary and never abort the surrounding run.
//!
//! The delete-then-reinsert sequence for uploads is not atomic: a failure
//! between the `DELETE` and the `PUT` leaves the target empty. That matches
//! the remote API's replace protocol and is reported as a plain failure.

use std::path::Path;

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use tracing::{error, info, warn};

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::resolve::ResolvedRequest;

/// Terminal status of one dispatched document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Terminal PUT accepted by the remote
    Success,
    /// Overwrite guard found the target already present; nothing written
    Skipped,
    /// Resolution or any protocol step failed
    Failed,
}

/// Result of dispatching one document
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Document identifier (source path)
    pub file: String,
    pub status: OutcomeStatus,
    /// Confirmation `Link` header on success, error text on failure
    pub message: Option<String>,
}

impl ImportOutcome {
    pub fn success(file: impl Into<String>, message: Option<String>) -> Self {
        Self {
            file: file.into(),
            status: OutcomeStatus::Success,
            message,
        }
    }

    pub fn skipped(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            status: OutcomeStatus::Skipped,
            message: Some(message.into()),
        }
    }

    pub fn failed(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            status: OutcomeStatus::Failed,
            message: Some(message.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == OutcomeStatus::Failed
    }
}

/// Dispatches resolved requests against the remote resource API
pub struct Dispatcher {
    client: reqwest::Client,
    config: ImportConfig,
}

impl Dispatcher {
    /// Build a dispatcher with one shared connection pool for the run.
    /// Custom headers from the configuration are installed as client
    /// defaults so every protocol step carries them.
    pub fn new(config: ImportConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        for (key, value) in &config.custom_headers {
            let name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
                .with_context(|| format!("Invalid header name '{}'", key))?;
            let value = reqwest::header::HeaderValue::from_str(value)
                .with_context(|| format!("Invalid header value for '{}'", key))?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(crate::config::USER_AGENT)
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    /// Run the full protocol for one request and settle it into an outcome.
    pub async fn dispatch(&self, request: ResolvedRequest) -> ImportOutcome {
        let file = request.file.clone();
        match self.run_protocol(&request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to write <{}> from '{}': {}", request.target_url, file, e);
                ImportOutcome::failed(file, e.to_string())
            }
        }
    }

    async fn run_protocol(&self, request: &ResolvedRequest) -> Result<ImportOutcome, ImportError> {
        let url = &request.target_url;

        if self.config.no_overwrite {
            // The guard only writes when the probe proves the target is
            // absent. 200 skips, 404 proceeds; any other status means
            // existence is unknown and the document fails without a write.
            let response = self
                .request(Method::GET, url)
                .send()
                .await
                .map_err(|e| ImportError::transport(url, &e))?;
            let status = response.status();
            if status == StatusCode::OK {
                warn!("Target <{}> already exists, skipping '{}'", url, request.file);
                return Ok(ImportOutcome::skipped(
                    &request.file,
                    format!("target <{}> exists", url),
                ));
            }
            if status != StatusCode::NOT_FOUND {
                let body = response.text().await.unwrap_or_default();
                return Err(ImportError::remote(url, status, &body));
            }
        }

        let response = match &request.upload {
            Some(upload) => {
                // Replace protocol: the remote cannot overwrite a stored
                // binary in place, so an existing target is deleted first.
                let status = self.probe(url).await?;
                if status != StatusCode::NOT_FOUND {
                    self.delete(url).await?;
                }
                self.put_multipart(request, upload).await?
            }
            None => self
                .request(Method::PUT, url)
                .json(&request.payload)
                .send()
                .await
                .map_err(|e| ImportError::transport(url, &e))?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImportError::remote(url, status, &body));
        }

        let link = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        match &link {
            Some(link) => info!("Wrote {}", link),
            None => info!("Wrote <{}>", url),
        }

        Ok(ImportOutcome::success(&request.file, link))
    }

    /// Existence probe. Any response settles the probe; only transport
    /// failures are errors.
    async fn probe(&self, url: &str) -> Result<StatusCode, ImportError> {
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| ImportError::transport(url, &e))?;
        Ok(response.status())
    }

    async fn delete(&self, url: &str) -> Result<(), ImportError> {
        let response = self
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(|e| ImportError::transport(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImportError::remote(url, status, &body));
        }
        Ok(())
    }

    /// Multipart `PUT`: `metadata` carries the JSON-encoded payload,
    /// `upload` the file contents under its original filename.
    async fn put_multipart(
        &self,
        request: &ResolvedRequest,
        upload: &Path,
    ) -> Result<reqwest::Response, ImportError> {
        let url = &request.target_url;

        let metadata = serde_json::to_string(&request.payload).map_err(|e| ImportError::Parse {
            file: request.file.clone(),
            message: e.to_string(),
        })?;

        let bytes = tokio::fs::read(upload).await.map_err(|e| ImportError::Request {
            url: url.clone(),
            message: format!("Cannot read upload file '{}': {}", upload.display(), e),
        })?;

        let filename = upload
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        let form = Form::new()
            .text("metadata", metadata)
            .part("upload", Part::bytes(bytes).file_name(filename));

        self.request(Method::PUT, url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImportError::transport(url, &e))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(auth) = &self.config.basic_auth {
            builder = builder.basic_auth(&auth.user, Some(&auth.password));
        }
        builder
    }
}
