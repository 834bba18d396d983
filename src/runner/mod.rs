//! Runner module: the inspection run and its entry points
//!
//! This module contains the run loop and what it leans on:
//! - Fixed-delay rate limiting behind an injectable clock
//! - Success/error record builders
//! - The orchestrator that ties stores, inspector and clock together

mod limiter;
mod orchestrator;
mod records;

pub use limiter::{Clock, RateLimiter, SystemClock};
pub use orchestrator::{
    InspectionRunner, RunKind, RunSummary, RunnerBuilder, StopReason, INSPECTION_CATEGORY,
    LIMIT_CATEGORY, STOP_CATEGORY,
};
pub use records::{build_error_record, build_success_record, OK_RESULT};

use crate::state::RunMode;
use crate::InspectorError;

/// Default mode of a quick check: only rows never inspected
pub const QUICK_CHECK_DEFAULT_MODE: &str = "new";

/// Default mode of a full inspection: every row
pub const FULL_INSPECTION_DEFAULT_MODE: &str = "all";

/// Runs a quick check
///
/// # Arguments
///
/// * `runner` - The configured runner
/// * `mode` - Mode string; `None` means `"new"`, unknown values mean `"all"`
///
/// # Example
///
/// ```no_run
/// use index_inspector::inspector::{InspectionClient, StaticToken};
/// use index_inspector::config::ApiConfig;
/// use index_inspector::runner::{run_quick_check, InspectionRunner};
/// use index_inspector::storage::SqliteStorage;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let storage = SqliteStorage::open_existing(Path::new("inspections.db"))?;
/// let client = InspectionClient::from_config(
///     &ApiConfig::default(),
///     Box::new(StaticToken::new("ya29.token")),
/// )?;
/// let runner = InspectionRunner::builder(&client)
///     .rows(&storage)
///     .settings(&storage)
///     .log(&storage)
///     .stop_flag(&storage)
///     .build()?;
/// let summary = run_quick_check(&runner, None).await?;
/// println!("{}", summary);
/// # Ok(())
/// # }
/// ```
pub async fn run_quick_check(
    runner: &InspectionRunner<'_>,
    mode: Option<&str>,
) -> Result<RunSummary, InspectorError> {
    let mode = RunMode::parse(mode.unwrap_or(QUICK_CHECK_DEFAULT_MODE));
    runner.run(RunKind::Quick, mode).await
}

/// Runs a full inspection
///
/// `None` means `"all"`; selection is otherwise identical to a quick check.
pub async fn run_full_inspection(
    runner: &InspectionRunner<'_>,
    mode: Option<&str>,
) -> Result<RunSummary, InspectorError> {
    let mode = RunMode::parse(mode.unwrap_or(FULL_INSPECTION_DEFAULT_MODE));
    runner.run(RunKind::Full, mode).await
}
