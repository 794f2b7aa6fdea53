//! restload CLI entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use restload::commands;
use restload::config::{parse_header, BasicAuth, ImportConfig, DEFAULT_REWRITE_HOST};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "restload")]
#[command(about = "Bulk-load front-matter documents into an HTTP resource API")]
#[command(version)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import files from folders or files into a host
    Import {
        /// Protocol and host to load data into (e.g. https://api.example.com)
        host: String,

        /// Directories or files to load
        file: Vec<PathBuf>,

        /// File containing a newline-separated list of paths to load
        #[arg(short, long)]
        input_file: Option<PathBuf>,

        /// Replace this string with the rewrite-to value in document bodies
        #[arg(short, long, default_value = DEFAULT_REWRITE_HOST)]
        rewrite_host: String,

        /// Replacement value for the rewrite-host string [default: the host argument]
        #[arg(short = 't', long)]
        rewrite_to: Option<String>,

        /// Send requests synchronously, one document at a time
        #[arg(short, long)]
        sync_requests: bool,

        /// Skip documents whose target already exists on the host
        #[arg(short = 'o', long)]
        no_overwrite: bool,

        /// Basic auth credentials as user:password
        #[arg(short = 'a', long = "headers-basic-auth")]
        basic_auth: Option<String>,

        /// Custom header as key:value (repeatable)
        #[arg(short = 'c', long = "custom-headers")]
        custom_headers: Vec<String>,
    },

    /// Validate data files to check if they can be imported
    Validate {
        /// Directories or files to check
        file: Vec<PathBuf>,

        /// File containing a newline-separated list of paths to check
        #[arg(short, long)]
        input_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let exit_code = match cli.command {
        Commands::Import {
            host,
            file,
            input_file,
            rewrite_host,
            rewrite_to,
            sync_requests,
            no_overwrite,
            basic_auth,
            custom_headers,
        } => {
            let mut config = ImportConfig::new(host, rewrite_host, rewrite_to);
            config.sync_requests = sync_requests;
            config.no_overwrite = no_overwrite;
            config.basic_auth = basic_auth.as_deref().map(BasicAuth::parse).transpose()?;
            config.custom_headers = custom_headers
                .iter()
                .map(|h| parse_header(h))
                .collect::<Result<Vec<_>>>()?;

            commands::import(config, file, input_file).await?
        }
        Commands::Validate { file, input_file } => commands::validate(file, input_file).await?,
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
