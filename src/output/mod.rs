//! Output module for reporting on inspection data
//!
//! This module handles:
//! - Row statistics for the `status` command
//! - Rendering run summaries and log entries for the terminal

pub mod stats;

pub use stats::{load_statistics, print_statistics, RowStatistics};

use crate::runner::{RunSummary, StopReason};
use crate::state::LogEntry;

/// Renders a run summary with its stop reason, for terminal output
pub fn render_run_summary(summary: &RunSummary) -> String {
    let reason = match summary.stop_reason {
        StopReason::Completed => None,
        StopReason::StopRequested => Some("stopped on request"),
        StopReason::LimitReached => Some("request budget reached"),
    };

    let mut out = summary.to_string();
    if summary.processed > 0 {
        out.push_str(&format!(
            " ({} ok, {} failed)",
            summary.succeeded, summary.failed
        ));
    }
    if let Some(reason) = reason {
        out.push_str(&format!("; {}", reason));
    }
    out
}

/// Prints log entries one per line
pub fn print_logs(entries: &[LogEntry]) {
    if entries.is_empty() {
        println!("No log entries.");
        return;
    }
    for entry in entries {
        println!("{}", entry);
    }
}
