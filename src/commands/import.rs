//! `import` command: discover documents and dispatch them against a host

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::config::ImportConfig;
use crate::discover::discover_files;
use crate::runner::ImportRunner;

/// Run a full import and return the process exit code.
pub async fn import(
    config: ImportConfig,
    files: Vec<PathBuf>,
    input_file: Option<PathBuf>,
) -> Result<i32> {
    let files = discover_files(&files, input_file.as_deref())?;

    info!(
        "Importing {} files into {}{}",
        files.len(),
        config.host,
        if config.sync_requests { " (sync)" } else { "" }
    );

    let runner = ImportRunner::new(config)?;
    let summary = runner.run(files).await;
    summary.log();

    Ok(summary.exit_code())
}
