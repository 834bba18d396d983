//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Index-Inspector
//! database. Column order of `subject_rows` follows the inspection sheet layout:
//! URL, Result, IndexingState, CoverageState, LastCrawlTime, RobotsTxtState,
//! PageFetchState, MobileUsability, CanonicalUrl, InspectionTime, Error.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Tracked URLs and their last inspection outcome
CREATE TABLE IF NOT EXISTS subject_rows (
    position INTEGER PRIMARY KEY,
    url TEXT NOT NULL,
    result TEXT NOT NULL DEFAULT '',
    indexing_state TEXT NOT NULL DEFAULT '',
    coverage_state TEXT NOT NULL DEFAULT '',
    last_crawl_time TEXT NOT NULL DEFAULT '',
    robots_txt_state TEXT NOT NULL DEFAULT '',
    page_fetch_state TEXT NOT NULL DEFAULT '',
    mobile_usability TEXT NOT NULL DEFAULT '',
    canonical_url TEXT NOT NULL DEFAULT '',
    inspection_time TEXT NOT NULL DEFAULT '',
    error TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_subject_rows_url ON subject_rows(url);
CREATE INDEX IF NOT EXISTS idx_subject_rows_result ON subject_rows(result);

-- Key/value run settings
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Append-only run log
CREATE TABLE IF NOT EXISTS logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    level TEXT NOT NULL,
    category TEXT NOT NULL,
    detail TEXT NOT NULL DEFAULT ''
);

-- Out-of-band control flags (e.g. stop requests)
CREATE TABLE IF NOT EXISTS control_flags (
    name TEXT PRIMARY KEY,
    value INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
