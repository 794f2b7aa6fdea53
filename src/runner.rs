//! Run orchestration
//!
//! Fans out one dispatch per document and joins all outcomes into a
//! [`RunSummary`]. In the default mode every document is spawned as its own
//! task and requests are in flight simultaneously; with `--sync-requests`
//! each document is settled before the next one starts.
//!
//! Whatever happens to an individual document, the joined summary holds
//! exactly one outcome per input file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use crate::config::ImportConfig;
use crate::dispatch::{Dispatcher, ImportOutcome, OutcomeStatus};
use crate::frontmatter::ImportDocument;
use crate::resolve::resolve;

/// Joined result of one import run
#[derive(Debug)]
pub struct RunSummary {
    pub outcomes: Vec<ImportOutcome>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ImportOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| o.is_failed())
    }

    /// Process exit code: 0 on a clean run, 1 if any document failed.
    /// Skipped documents do not fail the run.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }

    /// Log the run totals and every failure with its file and message.
    pub fn log(&self) {
        info!(
            "Imported {} documents: {} succeeded, {} skipped, {} failed",
            self.total(),
            self.count(OutcomeStatus::Success),
            self.count(OutcomeStatus::Skipped),
            self.count(OutcomeStatus::Failed),
        );
        for failure in self.failures() {
            error!(
                "{}: {}",
                failure.file,
                failure.message.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

/// Load, resolve and dispatch one document. Never fails the run: every
/// error path settles into a `Failed` outcome.
pub async fn process_document(
    dispatcher: &Dispatcher,
    config: &ImportConfig,
    path: &Path,
) -> ImportOutcome {
    let file = path.display().to_string();
    info!("Loading data from {}", file);

    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) => {
            error!("Cannot read '{}': {}", file, e);
            return ImportOutcome::failed(file, format!("Cannot read file: {}", e));
        }
    };

    let doc = match ImportDocument::parse(path, &contents) {
        Ok(doc) => doc,
        Err(e) => {
            error!("{}", e);
            return ImportOutcome::failed(file, e.to_string());
        }
    };

    let request = match resolve(&doc, config) {
        Ok(request) => request,
        Err(e) => {
            error!("{}", e);
            return ImportOutcome::failed(file, e.to_string());
        }
    };

    dispatcher.dispatch(request).await
}

/// Drives a whole run over a discovered file set
pub struct ImportRunner {
    dispatcher: Arc<Dispatcher>,
    config: ImportConfig,
}

impl ImportRunner {
    pub fn new(config: ImportConfig) -> Result<Self> {
        let dispatcher = Arc::new(Dispatcher::new(config.clone())?);
        Ok(Self { dispatcher, config })
    }

    /// Dispatch every file and join all outcomes.
    pub async fn run(&self, files: Vec<PathBuf>) -> RunSummary {
        let outcomes = if self.config.sync_requests {
            self.run_sequential(files).await
        } else {
            self.run_concurrent(files).await
        };
        RunSummary { outcomes }
    }

    async fn run_sequential(&self, files: Vec<PathBuf>) -> Vec<ImportOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());
        for path in files {
            outcomes.push(process_document(&self.dispatcher, &self.config, &path).await);
        }
        outcomes
    }

    /// One task per document, all in flight at once. The join below is the
    /// single synchronization barrier for the run; a panicked task still
    /// yields an outcome for its document.
    async fn run_concurrent(&self, files: Vec<PathBuf>) -> Vec<ImportOutcome> {
        let mut handles = Vec::with_capacity(files.len());
        for path in files {
            let dispatcher = Arc::clone(&self.dispatcher);
            let config = self.config.clone();
            let file = path.display().to_string();
            let handle = tokio::spawn(async move {
                process_document(&dispatcher, &config, &path).await
            });
            handles.push((file, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (file, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => outcomes.push(ImportOutcome::failed(
                    file,
                    format!("Dispatch task failed: {}", e),
                )),
            }
        }
        outcomes
    }
}
