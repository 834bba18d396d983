//! Append-only log entries written alongside a run

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Info,
    Error,
}

impl LogLevel {
    /// Converts the level to its stored string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Error => "ERROR",
        }
    }

    /// Parses a level from its stored string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "INFO" => Some(Self::Info),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// One record in the log sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// Short label such as `Inspection` or `Limit reached`
    pub category: String,
    pub detail: String,
}

impl LogEntry {
    pub fn info(
        timestamp: DateTime<Utc>,
        category: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            level: LogLevel::Info,
            category: category.into(),
            detail: detail.into(),
        }
    }

    pub fn error(
        timestamp: DateTime<Utc>,
        category: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            level: LogLevel::Error,
            category: category.into(),
            detail: detail.into(),
        }
    }

    pub fn timestamp_string(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<5} [{}] {}",
            self.timestamp_string(),
            self.level,
            self.category,
            self.detail
        )
    }
}
