//! Index-Inspector main entry point
//!
//! This is the command-line interface for the Index-Inspector run loop.

use anyhow::Context;
use clap::{Parser, Subcommand};
use index_inspector::config::{load_config_with_hash, Config};
use index_inspector::inspector::{credential_provider, InspectionClient};
use index_inspector::output::{load_statistics, print_logs, print_statistics, render_run_summary};
use index_inspector::runner::{run_full_inspection, run_quick_check, InspectionRunner};
use index_inspector::storage::{init_storage, open_storage, SqliteStorage, StopFlag};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Index-Inspector: a rate-limited URL inspection runner
///
/// Index-Inspector sends the tracked URLs to the URL inspection API one at a
/// time and stores each URL's index status, so repeated runs only need to
/// pick up new or failed URLs.
#[derive(Parser, Debug)]
#[command(name = "index-inspector")]
#[command(version)]
#[command(about = "A rate-limited URL inspection runner", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "index-inspector.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database and its tables
    Init,

    /// Add URLs to inspect
    Add {
        /// URLs to add
        urls: Vec<String>,

        /// Read additional URLs from a file, one per line
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Set a run setting (siteUrl, maxRequestsPerRun, delayMs)
    Set { key: String, value: String },

    /// Inspect only URLs without a result (default mode "new")
    Quick {
        /// Selection mode: all, new, empty or errors
        #[arg(long)]
        mode: Option<String>,
    },

    /// Inspect every URL (default mode "all")
    Full {
        /// Selection mode: all, new, empty or errors
        #[arg(long)]
        mode: Option<String>,
    },

    /// Ask a running inspection to stop before its next URL
    Stop,

    /// Show statistics from the database and exit
    Status,

    /// Show the most recent log entries
    Logs {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let db_path = Path::new(&config.storage.database_path);

    match cli.command {
        Command::Init => {
            init_storage(db_path)?;
            println!("✓ Database ready at {}", db_path.display());
        }
        Command::Add { urls, file } => handle_add(&open_storage(db_path)?, urls, file)?,
        Command::Set { key, value } => {
            open_storage(db_path)?.set_setting(key.trim(), value.trim())?;
            println!("✓ {} = {}", key.trim(), value.trim());
        }
        Command::Quick { mode } => handle_run(&config, db_path, false, mode.as_deref()).await?,
        Command::Full { mode } => handle_run(&config, db_path, true, mode.as_deref()).await?,
        Command::Stop => {
            open_storage(db_path)?.request_stop()?;
            println!("✓ Stop requested; the running inspection ends before its next URL");
        }
        Command::Status => {
            let storage = open_storage(db_path)?;
            println!("Database: {}\n", db_path.display());
            print_statistics(&load_statistics(&storage)?);
        }
        Command::Logs { limit } => print_logs(&open_storage(db_path)?.recent_logs(limit)?),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("index_inspector=info,warn"),
            1 => EnvFilter::new("index_inspector=debug,info"),
            2 => EnvFilter::new("index_inspector=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `add`: validates and appends new URLs, skipping ones already tracked
fn handle_add(
    storage: &SqliteStorage,
    mut urls: Vec<String>,
    file: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(path) = file {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        urls.extend(content.lines().map(str::to_string));
    }

    let mut seen = HashSet::new();
    let (mut added, mut skipped) = (0usize, 0usize);

    for raw in urls {
        let url = raw.trim();
        if url.is_empty() {
            continue;
        }

        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => {
                tracing::warn!("Skipping invalid URL: {}", url);
                skipped += 1;
                continue;
            }
        }

        if !seen.insert(url.to_string()) || storage.contains_url(url)? {
            tracing::debug!("Already tracked: {}", url);
            skipped += 1;
            continue;
        }

        storage.add_url(url)?;
        added += 1;
    }

    println!("✓ Added {} URLs ({} skipped)", added, skipped);
    Ok(())
}

/// Handles `quick` and `full`: runs the inspection loop against the database
async fn handle_run(
    config: &Config,
    db_path: &Path,
    full: bool,
    mode: Option<&str>,
) -> anyhow::Result<()> {
    let storage = open_storage(db_path)?;
    let client = InspectionClient::from_config(&config.api, credential_provider(&config.credentials))?;

    let runner = InspectionRunner::builder(&client)
        .rows(&storage)
        .settings(&storage)
        .log(&storage)
        .stop_flag(&storage)
        .build()?;

    let result = if full {
        run_full_inspection(&runner, mode).await
    } else {
        run_quick_check(&runner, mode).await
    };

    match result {
        Ok(summary) => {
            println!("{}", render_run_summary(&summary));
            Ok(())
        }
        Err(e) => {
            tracing::error!("Inspection run failed: {}", e);
            Err(e.into())
        }
    }
}
