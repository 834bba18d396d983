//! SQLite storage implementation
//!
//! One database file holds all four stores a run needs. WAL mode plus a busy
//! timeout lets a second process set the stop flag while a run is writing.

use crate::state::{LogEntry, LogLevel, RowUpdate, SubjectRow};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{
    LogSink, RowStore, SettingsStore, StopFlag, StorageError, StorageResult,
};
use crate::InspectorError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Name of the control flag polled by runs
pub const STOP_FLAG_NAME: &str = "stop_requested";

const ROW_COLUMNS: &str = "position, url, result, indexing_state, coverage_state, \
     last_crawl_time, robots_txt_state, page_fetch_state, mobile_usability, \
     canonical_url, inspection_time, error";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database at `path`, creating it and its schema if needed
    pub fn new(path: &Path) -> Result<Self, InspectorError> {
        let conn = Connection::open(path).map_err(StorageError::from)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )
        .map_err(StorageError::from)?;
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(StorageError::from)?;

        initialize_schema(&conn).map_err(StorageError::from)?;

        Ok(Self { conn })
    }

    /// Opens an existing database without creating one
    ///
    /// # Returns
    ///
    /// * `Err(InspectorError::MissingStore)` - no database file at `path`
    pub fn open_existing(path: &Path) -> Result<Self, InspectorError> {
        if !path.exists() {
            return Err(InspectorError::MissingStore(format!(
                "database {} does not exist (run `init` first)",
                path.display()
            )));
        }
        Self::new(path)
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, InspectorError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        initialize_schema(&conn).map_err(StorageError::from)?;
        Ok(Self { conn })
    }

    /// Appends a subject row for `url` and returns its position
    pub fn add_url(&self, url: &str) -> StorageResult<usize> {
        let next: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM subject_rows",
            [],
            |row| row.get(0),
        )?;
        self.conn.execute(
            "INSERT INTO subject_rows (position, url) VALUES (?1, ?2)",
            params![next, url],
        )?;
        Ok(next as usize)
    }

    /// Returns true if some row already tracks `url`
    pub fn contains_url(&self, url: &str) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT position FROM subject_rows WHERE url = ?1 LIMIT 1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Inserts or replaces a setting
    pub fn set_setting(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Returns up to `limit` most recent log entries, oldest first
    pub fn recent_logs(&self, limit: usize) -> StorageResult<Vec<LogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, level, category, detail FROM
             (SELECT id, timestamp, level, category, detail FROM logs ORDER BY id DESC LIMIT ?1)
             ORDER BY id ASC",
        )?;

        let raw = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(timestamp, level, category, detail)| -> StorageResult<LogEntry> {
                let timestamp = DateTime::parse_from_rfc3339(&timestamp)
                    .map_err(|e| {
                        StorageError::Database(format!("Bad log timestamp '{}': {}", timestamp, e))
                    })?
                    .with_timezone(&Utc);
                let level = LogLevel::from_db_string(&level).ok_or_else(|| {
                    StorageError::Database(format!("Unknown log level '{}'", level))
                })?;
                Ok(LogEntry {
                    timestamp,
                    level,
                    category,
                    detail,
                })
            })
            .collect()
    }

    fn set_flag(&self, name: &str, value: bool) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO control_flags (name, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![name, value as i64, now],
        )?;
        Ok(())
    }
}

fn subject_row_from(row: &rusqlite::Row<'_>) -> rusqlite::Result<SubjectRow> {
    Ok(SubjectRow {
        position: row.get::<_, i64>(0)? as usize,
        url: row.get(1)?,
        result: row.get(2)?,
        indexing_state: row.get(3)?,
        coverage_state: row.get(4)?,
        last_crawl_time: row.get(5)?,
        robots_txt_state: row.get(6)?,
        page_fetch_state: row.get(7)?,
        mobile_usability: row.get(8)?,
        canonical_url: row.get(9)?,
        inspection_time: row.get(10)?,
        error: row.get(11)?,
    })
}

impl RowStore for SqliteStorage {
    fn list_rows(&self) -> StorageResult<Vec<SubjectRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM subject_rows ORDER BY position ASC",
            ROW_COLUMNS
        ))?;

        let rows = stmt
            .query_map([], subject_row_from)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn read_row(&self, position: usize) -> StorageResult<Option<SubjectRow>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM subject_rows WHERE position = ?1",
                    ROW_COLUMNS
                ),
                params![position as i64],
                subject_row_from,
            )
            .optional()?;

        Ok(row)
    }

    fn write_row(&self, position: usize, update: &RowUpdate) -> StorageResult<()> {
        let changed = self.conn.execute(
            "UPDATE subject_rows SET result = ?1, indexing_state = ?2, coverage_state = ?3,
             last_crawl_time = ?4, robots_txt_state = ?5, page_fetch_state = ?6,
             mobile_usability = ?7, canonical_url = ?8, inspection_time = ?9, error = ?10
             WHERE position = ?11",
            params![
                update.result,
                update.indexing_state,
                update.coverage_state,
                update.last_crawl_time,
                update.robots_txt_state,
                update.page_fetch_state,
                update.mobile_usability,
                update.canonical_url,
                update.inspection_time_string(),
                update.error,
                position as i64
            ],
        )?;

        if changed == 0 {
            return Err(StorageError::RowNotFound(position));
        }
        Ok(())
    }
}

impl SettingsStore for SqliteStorage {
    fn snapshot(&self) -> StorageResult<HashMap<String, String>> {
        let mut stmt = self.conn.prepare("SELECT key, value FROM settings")?;

        let settings = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<HashMap<String, String>, _>>()?;

        Ok(settings)
    }
}

impl LogSink for SqliteStorage {
    fn append(&self, entry: &LogEntry) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO logs (timestamp, level, category, detail) VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.timestamp_string(),
                entry.level.to_db_string(),
                entry.category,
                entry.detail
            ],
        )?;
        Ok(())
    }
}

impl StopFlag for SqliteStorage {
    fn is_stop_requested(&self) -> StorageResult<bool> {
        let value: Option<i64> = self
            .conn
            .query_row(
                "SELECT value FROM control_flags WHERE name = ?1",
                params![STOP_FLAG_NAME],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.unwrap_or(0) != 0)
    }

    fn request_stop(&self) -> StorageResult<()> {
        self.set_flag(STOP_FLAG_NAME, true)
    }

    fn clear_stop(&self) -> StorageResult<()> {
        self.set_flag(STOP_FLAG_NAME, false)
    }
}
