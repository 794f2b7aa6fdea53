//! restload: bulk-load front-matter documents into an HTTP resource API
//!
//! Operators use this to seed or migrate data into a service. Each document
//! is a JSON or YAML file with a front matter header naming its target
//! resource path and, optionally, a companion binary upload:
//! - documents are resolved into concrete `PUT` upserts against the host
//! - uploads use a replace protocol (probe, `DELETE`, multipart `PUT`)
//! - an overwrite guard can skip targets that already exist
//! - requests run concurrently by default, strictly in order with `--sync-requests`
//! - per-document failures never abort the run; the summary decides the exit code

pub mod commands;
pub mod config;
pub mod decode;
pub mod discover;
pub mod dispatch;
pub mod error;
pub mod frontmatter;
pub mod resolve;
pub mod runner;

pub use config::ImportConfig;
pub use dispatch::{Dispatcher, ImportOutcome, OutcomeStatus};
pub use error::ImportError;
pub use frontmatter::ImportDocument;
pub use resolve::ResolvedRequest;
pub use runner::{ImportRunner, RunSummary};
