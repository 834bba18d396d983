//! Storage module for persisting inspection data
//!
//! This module handles everything a run reads from or writes to durable
//! storage:
//! - Subject rows (tracked URLs and their last inspection outcome)
//! - The key/value settings snapshot
//! - The append-only log
//! - The out-of-band stop flag
//!
//! Backends: SQLite for real use, in-memory for tests and embedding.

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStorage, STOP_FLAG_NAME};
pub use traits::{
    DiscardLog, LogSink, NeverStop, RowStore, SettingsStore, StopFlag, StorageError,
    StorageResult,
};

use crate::InspectorError;
use std::path::Path;

/// Opens an existing inspection database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Database opened
/// * `Err(InspectorError::MissingStore)` - No database at `path`
pub fn open_storage(path: &Path) -> Result<SqliteStorage, InspectorError> {
    SqliteStorage::open_existing(path)
}

/// Creates (or opens) an inspection database and its schema
pub fn init_storage(path: &Path) -> Result<SqliteStorage, InspectorError> {
    SqliteStorage::new(path)
}
