//! Run configuration for an import invocation
//!
//! Built once from CLI arguments, read-only for the lifetime of the run.

use std::time::Duration;

use anyhow::{bail, Result};

/// Default marker string replaced in document bodies before decoding
pub const DEFAULT_REWRITE_HOST: &str = "http://localhost";

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("restload/", env!("CARGO_PKG_VERSION"));

/// Basic-auth credentials parsed from `user:password`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub user: String,
    pub password: String,
}

impl BasicAuth {
    /// Parse a `user:password` option value. The password may itself
    /// contain colons; only the first one splits.
    pub fn parse(value: &str) -> Result<Self> {
        match value.split_once(':') {
            Some((user, password)) if !user.is_empty() => Ok(Self {
                user: user.to_string(),
                password: password.to_string(),
            }),
            _ => bail!("Invalid basic auth '{}', expected user:password", value),
        }
    }
}

/// Parse one `key:value` custom header option
pub fn parse_header(value: &str) -> Result<(String, String)> {
    match value.split_once(':') {
        Some((key, val)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), val.trim().to_string()))
        }
        _ => bail!("Invalid header '{}', expected key:value", value),
    }
}

/// Configuration for one import run
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Protocol and host to load data into (e.g. `https://api.example.com`)
    pub host: String,
    /// String replaced in document bodies before decoding
    pub rewrite_host: String,
    /// Replacement value; defaults to `host` when not given
    pub rewrite_to: String,
    /// Send requests strictly sequentially
    pub sync_requests: bool,
    /// Skip documents whose target already exists
    pub no_overwrite: bool,
    /// Basic-auth credentials added to every request
    pub basic_auth: Option<BasicAuth>,
    /// Custom headers added to every request
    pub custom_headers: Vec<(String, String)>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ImportConfig {
    /// Build a run configuration. `rewrite_to` left as `None` resolves to
    /// the host argument, matching the CLI's default-sentinel behavior.
    pub fn new(
        host: impl Into<String>,
        rewrite_host: impl Into<String>,
        rewrite_to: Option<String>,
    ) -> Self {
        let host = host.into();
        let rewrite_to = rewrite_to.unwrap_or_else(|| host.clone());
        Self {
            host,
            rewrite_host: rewrite_host.into(),
            rewrite_to,
            sync_requests: false,
            no_overwrite: false,
            basic_auth: None,
            custom_headers: Vec::new(),
            timeout: Duration::from_secs(30),
        }
    }
}
