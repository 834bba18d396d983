//! State module: the data a run reads and writes
//!
//! # Components
//!
//! - `SubjectRow`: one tracked URL and its last inspection outcome
//! - `RowUpdate`: the result fields written back after an attempt
//! - `LogEntry`: append-only record emitted by a run
//! - `RunMode` / `should_process`: which rows a run attempts

mod log_entry;
mod mode;
mod row;

// Re-export main types
pub use log_entry::{LogEntry, LogLevel};
pub use mode::{should_process, RunMode};
pub use row::{RowUpdate, SubjectRow, ERROR_RESULT};
