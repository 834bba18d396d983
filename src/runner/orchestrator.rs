//! Run orchestrator - the inspection loop
//!
//! This module drives one run end to end:
//! - Resolving run settings from the settings snapshot
//! - Clearing the previous run's stop request
//! - Walking subject rows in storage order
//! - Selecting rows by mode, enforcing the request budget, polling the stop flag
//! - Inspecting, persisting the outcome and logging, one row at a time
//! - Pausing between requests

use crate::config::RunSettings;
use crate::inspector::Inspector;
use crate::runner::limiter::{Clock, RateLimiter, SystemClock};
use crate::runner::records::{build_error_record, build_success_record};
use crate::state::{should_process, LogEntry, LogLevel, RunMode, SubjectRow};
use crate::storage::{DiscardLog, LogSink, NeverStop, RowStore, SettingsStore, StopFlag};
use crate::InspectorError;
use std::fmt;

static DISCARD_LOG: DiscardLog = DiscardLog;
static NEVER_STOP: NeverStop = NeverStop;
static SYSTEM_CLOCK: SystemClock = SystemClock;

/// Log category for per-URL outcomes
pub const INSPECTION_CATEGORY: &str = "Inspection";

/// Log category written when a run honours a stop request
pub const STOP_CATEGORY: &str = "Stop requested";

/// Log category written when a run exhausts its request budget
pub const LIMIT_CATEGORY: &str = "Limit reached";

/// Cosmetic label of the entry point that started a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Quick,
    Full,
}

impl RunKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why the row loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every row was visited
    Completed,

    /// The stop flag was set
    StopRequested,

    /// `maxRequestsPerRun` API calls were made
    LimitReached,
}

/// Outcome of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub kind: RunKind,
    pub mode: RunMode,
    /// Rows that matched the mode and passed the budget check
    pub inspected: u32,
    /// Rows that reached the API call, success or failure
    pub processed: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub stop_reason: StopReason,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inspected == 0 {
            write!(f, "No URLs matched mode \"{}\"", self.mode)
        } else {
            write!(f, "Processed {} URLs in mode \"{}\"", self.processed, self.mode)
        }
    }
}

/// Runs inspections over a set of stores
///
/// Every collaborator is borrowed, so one storage backend may serve as row
/// store, settings store, log sink and stop flag at once.
pub struct InspectionRunner<'a> {
    rows: &'a dyn RowStore,
    settings: &'a dyn SettingsStore,
    log: &'a dyn LogSink,
    stop: &'a dyn StopFlag,
    inspector: &'a dyn Inspector,
    clock: &'a dyn Clock,
}

/// Builder for [`InspectionRunner`]
pub struct RunnerBuilder<'a> {
    rows: Option<&'a dyn RowStore>,
    settings: Option<&'a dyn SettingsStore>,
    log: Option<&'a dyn LogSink>,
    stop: Option<&'a dyn StopFlag>,
    inspector: &'a dyn Inspector,
    clock: Option<&'a dyn Clock>,
}

impl<'a> RunnerBuilder<'a> {
    pub fn rows(mut self, rows: &'a dyn RowStore) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn settings(mut self, settings: &'a dyn SettingsStore) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn log(mut self, log: &'a dyn LogSink) -> Self {
        self.log = Some(log);
        self
    }

    pub fn stop_flag(mut self, stop: &'a dyn StopFlag) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Finishes the runner
    ///
    /// # Returns
    ///
    /// * `Err(InspectorError::MissingStore)` - row or settings store not supplied
    pub fn build(self) -> Result<InspectionRunner<'a>, InspectorError> {
        let rows = self
            .rows
            .ok_or_else(|| InspectorError::MissingStore("subject rows".to_string()))?;
        let settings = self
            .settings
            .ok_or_else(|| InspectorError::MissingStore("settings".to_string()))?;

        Ok(InspectionRunner {
            rows,
            settings,
            log: self.log.unwrap_or(&DISCARD_LOG),
            stop: self.stop.unwrap_or(&NEVER_STOP),
            inspector: self.inspector,
            clock: self.clock.unwrap_or(&SYSTEM_CLOCK),
        })
    }
}

impl<'a> InspectionRunner<'a> {
    pub fn builder(inspector: &'a dyn Inspector) -> RunnerBuilder<'a> {
        RunnerBuilder {
            rows: None,
            settings: None,
            log: None,
            stop: None,
            inspector,
            clock: None,
        }
    }

    /// Runs one inspection pass
    ///
    /// # Flow
    ///
    /// 1. Resolve settings (fails with `MissingSiteUrl` before any row is read)
    /// 2. Clear the stop flag
    /// 3. For each row with a URL, in storage order:
    ///    a. stop flag set → log and end
    ///    b. mode does not select the row → skip
    ///    c. budget spent → log and end
    ///    d. inspect, persist success or error record, log
    ///    e. pause
    ///
    /// Per-URL API failures are recorded on the row and never end the run.
    /// Storage failures do.
    pub async fn run(&self, kind: RunKind, mode: RunMode) -> Result<RunSummary, InspectorError> {
        let snapshot = self.settings.snapshot()?;
        let settings = RunSettings::from_snapshot(&snapshot)?;
        self.stop.clear_stop()?;

        let limiter = RateLimiter::new(settings.delay);
        tracing::info!(
            "Starting {} run in mode \"{}\" for {} (budget {}, delay {}ms)",
            kind,
            mode,
            settings.site_url,
            settings.max_requests_per_run,
            limiter.delay().as_millis()
        );

        let rows = self.rows.list_rows()?;

        let mut summary = RunSummary {
            kind,
            mode,
            inspected: 0,
            processed: 0,
            succeeded: 0,
            failed: 0,
            stop_reason: StopReason::Completed,
        };

        for row in rows.iter().filter(|r| !r.url.trim().is_empty()) {
            if self.stop.is_stop_requested()? {
                self.record(LogEntry::info(
                    self.clock.now(),
                    STOP_CATEGORY,
                    format!("Run stopped before {}", row.url),
                ))?;
                summary.stop_reason = StopReason::StopRequested;
                break;
            }

            if !should_process(mode, &row.result, &row.error) {
                continue;
            }

            if summary.processed >= settings.max_requests_per_run {
                self.record(LogEntry::info(
                    self.clock.now(),
                    LIMIT_CATEGORY,
                    format!(
                        "maxRequestsPerRun = {} reached before {}",
                        settings.max_requests_per_run, row.url
                    ),
                ))?;
                summary.stop_reason = StopReason::LimitReached;
                break;
            }

            summary.inspected += 1;
            if self.process_row(row, &settings.site_url).await? {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
            summary.processed += 1;

            limiter.pause(self.clock).await;
        }

        tracing::info!(
            "{} run finished ({:?}): {} ok, {} failed",
            kind,
            summary.stop_reason,
            summary.succeeded,
            summary.failed
        );

        Ok(summary)
    }

    /// Inspects one row and persists the outcome
    ///
    /// Returns `Ok(true)` on success, `Ok(false)` when the failure was recorded
    /// on the row.
    async fn process_row(&self, row: &SubjectRow, site_url: &str) -> Result<bool, InspectorError> {
        tracing::debug!("Inspecting row {}: {}", row.position, row.url);

        match self.inspector.inspect(&row.url, site_url).await {
            Ok(inspection) => {
                let now = self.clock.now();
                let update = build_success_record(&inspection, now);
                self.rows.write_row(row.position, &update)?;
                self.record(LogEntry::info(
                    now,
                    INSPECTION_CATEGORY,
                    format!("OK for {} ({})", row.url, update.result),
                ))?;
                Ok(true)
            }
            Err(e) => {
                let now = self.clock.now();
                let update = build_error_record(&e, now);
                self.rows.write_row(row.position, &update)?;
                self.record(LogEntry::error(
                    now,
                    INSPECTION_CATEGORY,
                    format!("Failed for {}: {}", row.url, e),
                ))?;
                Ok(false)
            }
        }
    }

    /// Appends a log entry and mirrors it to tracing
    fn record(&self, entry: LogEntry) -> Result<(), InspectorError> {
        match entry.level {
            LogLevel::Info => tracing::info!("[{}] {}", entry.category, entry.detail),
            LogLevel::Error => tracing::error!("[{}] {}", entry.category, entry.detail),
        }
        self.log.append(&entry)?;
        Ok(())
    }
}
