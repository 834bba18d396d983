//! Subject row and row update definitions
//!
//! A subject row is one tracked URL plus the outcome of its last inspection.

use chrono::{DateTime, SecondsFormat, Utc};

/// Result token stored on a row whose last attempt failed
pub const ERROR_RESULT: &str = "ERROR";

/// One tracked URL and its last-known inspection state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectRow {
    /// Zero-based position in storage order
    pub position: usize,
    pub url: String,
    /// Empty, `ERROR`, or a provider-defined state token
    pub result: String,
    pub indexing_state: String,
    pub coverage_state: String,
    pub last_crawl_time: String,
    pub robots_txt_state: String,
    pub page_fetch_state: String,
    pub mobile_usability: String,
    pub canonical_url: String,
    /// RFC 3339 timestamp of the last processed attempt
    pub inspection_time: String,
    /// Failure message, non-empty only when `result` is `ERROR`
    pub error: String,
}

impl SubjectRow {
    /// Creates a never-inspected row for the given URL
    pub fn new(position: usize, url: impl Into<String>) -> Self {
        Self {
            position,
            url: url.into(),
            ..Self::default()
        }
    }

    /// Returns true if no attempt has ever been recorded on this row
    pub fn is_pristine(&self) -> bool {
        self.result.is_empty() && self.inspection_time.is_empty()
    }

    /// Returns true if the last recorded attempt failed
    pub fn is_error(&self) -> bool {
        self.result == ERROR_RESULT || !self.error.is_empty()
    }

    /// Overwrites every result field with the update; `url` is never touched
    pub fn apply(&mut self, update: &RowUpdate) {
        self.result = update.result.clone();
        self.indexing_state = update.indexing_state.clone();
        self.coverage_state = update.coverage_state.clone();
        self.last_crawl_time = update.last_crawl_time.clone();
        self.robots_txt_state = update.robots_txt_state.clone();
        self.page_fetch_state = update.page_fetch_state.clone();
        self.mobile_usability = update.mobile_usability.clone();
        self.canonical_url = update.canonical_url.clone();
        self.inspection_time = update.inspection_time_string();
        self.error = update.error.clone();
    }
}

/// The full set of result fields written to a row after one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowUpdate {
    pub result: String,
    pub indexing_state: String,
    pub coverage_state: String,
    pub last_crawl_time: String,
    pub robots_txt_state: String,
    pub page_fetch_state: String,
    pub mobile_usability: String,
    pub canonical_url: String,
    pub inspection_time: DateTime<Utc>,
    pub error: String,
}

impl RowUpdate {
    /// Returns true if this update records a failed attempt
    pub fn is_error(&self) -> bool {
        self.result == ERROR_RESULT
    }

    /// Formats the inspection time the way it is persisted
    pub fn inspection_time_string(&self) -> String {
        self.inspection_time
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
