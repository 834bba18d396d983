//! Index-Inspector: a resumable, rate-limited URL inspection runner
//!
//! This crate drives an external URL inspection API against a list of tracked
//! subject URLs, one request at a time, and persists the per-URL outcome into
//! durable tabular storage. Runs can be incremental (only never-inspected rows),
//! full, or limited to rows whose last attempt failed, and are bounded by a
//! per-run request budget and a cooperative stop flag.

pub mod config;
pub mod inspector;
pub mod output;
pub mod runner;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for run-level failures
///
/// Per-URL failures never surface here; they are recorded on the row as an
/// error record (see [`inspector::InspectionError`]).
#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("Required store is not available: {0}")]
    MissingStore(String),

    #[error("Missing siteUrl setting (set key=siteUrl to your Search Console property)")]
    MissingSiteUrl,

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use config::{Config, RunSettings};
pub use inspector::{IndexInspection, InspectionClient, InspectionError, Inspector};
pub use runner::{run_full_inspection, run_quick_check, InspectionRunner, RunKind, RunSummary};
pub use state::{should_process, RunMode, RowUpdate, SubjectRow};
