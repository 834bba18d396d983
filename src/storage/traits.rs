//! Storage traits and error types
//!
//! A run talks to four narrow collaborators instead of one storage handle:
//! subject rows, the settings snapshot, the log sink and the stop flag. One
//! backend may implement all of them; every method takes `&self` so a single
//! backend can serve all four roles at once.

use crate::state::{LogEntry, RowUpdate, SubjectRow};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Row not found at position {0}")]
    RowNotFound(usize),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Tabular store of subject rows, addressed by position
pub trait RowStore {
    /// Returns every row in stable storage order
    fn list_rows(&self) -> StorageResult<Vec<SubjectRow>>;

    /// Reads a single row by position
    fn read_row(&self, position: usize) -> StorageResult<Option<SubjectRow>>;

    /// Overwrites the result fields of the row at `position`
    ///
    /// The row's URL is never modified. Fails with
    /// [`StorageError::RowNotFound`] if no row exists at that position.
    fn write_row(&self, position: usize, update: &RowUpdate) -> StorageResult<()>;
}

/// Flat key/value settings store
pub trait SettingsStore {
    /// Reads every setting at once
    fn snapshot(&self) -> StorageResult<HashMap<String, String>>;
}

/// Append-only destination for log entries
pub trait LogSink {
    fn append(&self, entry: &LogEntry) -> StorageResult<()>;
}

/// Named stop flag, settable out-of-band and polled by a run
pub trait StopFlag {
    /// Returns true if an operator asked the current run to stop
    fn is_stop_requested(&self) -> StorageResult<bool>;

    /// Sets the flag
    fn request_stop(&self) -> StorageResult<()>;

    /// Clears the flag
    fn clear_stop(&self) -> StorageResult<()>;
}

/// Log sink that keeps nothing
///
/// Runs mirror every entry to `tracing`, so with this sink entries still show
/// up in the process log.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardLog;

impl LogSink for DiscardLog {
    fn append(&self, _entry: &LogEntry) -> StorageResult<()> {
        Ok(())
    }
}

/// Stop flag that is never set
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverStop;

impl StopFlag for NeverStop {
    fn is_stop_requested(&self) -> StorageResult<bool> {
        Ok(false)
    }

    fn request_stop(&self) -> StorageResult<()> {
        Err(StorageError::ConstraintViolation(
            "this run has no stop flag store".to_string(),
        ))
    }

    fn clear_stop(&self) -> StorageResult<()> {
        Ok(())
    }
}
