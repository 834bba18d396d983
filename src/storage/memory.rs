//! In-memory storage implementation
//!
//! Implements every store trait over `Mutex`-guarded collections. Useful for
//! tests and for embedding the runner where rows come from somewhere else.

use crate::state::{LogEntry, RowUpdate, SubjectRow};
use crate::storage::traits::{
    LogSink, RowStore, SettingsStore, StopFlag, StorageError, StorageResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// In-memory storage backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<SubjectRow>>,
    settings: Mutex<HashMap<String, String>>,
    logs: Mutex<Vec<LogEntry>>,
    stop: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> StorageResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| StorageError::Database("memory store lock poisoned".to_string()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding one never-inspected row per URL
    pub fn with_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = urls
            .into_iter()
            .enumerate()
            .map(|(position, url)| SubjectRow::new(position, url))
            .collect();
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    /// Appends a row as-is, renumbering its position to the end of the store
    pub fn push_row(&self, mut row: SubjectRow) -> StorageResult<usize> {
        let mut rows = lock(&self.rows)?;
        row.position = rows.len();
        let position = row.position;
        rows.push(row);
        Ok(position)
    }

    pub fn set_setting(&self, key: impl Into<String>, value: impl Into<String>) -> StorageResult<()> {
        lock(&self.settings)?.insert(key.into(), value.into());
        Ok(())
    }

    /// Returns a copy of all log entries appended so far
    pub fn logs(&self) -> StorageResult<Vec<LogEntry>> {
        Ok(lock(&self.logs)?.clone())
    }
}

impl RowStore for MemoryStore {
    fn list_rows(&self) -> StorageResult<Vec<SubjectRow>> {
        Ok(lock(&self.rows)?.clone())
    }

    fn read_row(&self, position: usize) -> StorageResult<Option<SubjectRow>> {
        Ok(lock(&self.rows)?.get(position).cloned())
    }

    fn write_row(&self, position: usize, update: &RowUpdate) -> StorageResult<()> {
        let mut rows = lock(&self.rows)?;
        let row = rows
            .get_mut(position)
            .ok_or(StorageError::RowNotFound(position))?;
        row.apply(update);
        Ok(())
    }
}

impl SettingsStore for MemoryStore {
    fn snapshot(&self) -> StorageResult<HashMap<String, String>> {
        Ok(lock(&self.settings)?.clone())
    }
}

impl LogSink for MemoryStore {
    fn append(&self, entry: &LogEntry) -> StorageResult<()> {
        lock(&self.logs)?.push(entry.clone());
        Ok(())
    }
}

impl StopFlag for MemoryStore {
    fn is_stop_requested(&self) -> StorageResult<bool> {
        Ok(self.stop.load(Ordering::SeqCst))
    }

    fn request_stop(&self) -> StorageResult<()> {
        self.stop.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn clear_stop(&self) -> StorageResult<()> {
        self.stop.store(false, Ordering::SeqCst);
        Ok(())
    }
}
