//! Run modes and the row selection rule
//!
//! The mode decides which rows a run will attempt, based only on what a
//! previous run stored in the row's `result` and `error` fields.

use crate::state::row::ERROR_RESULT;
use std::fmt;

/// Selection policy for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// Every row with a URL
    All,

    /// Rows with no stored result yet
    New,

    /// Alias of `New`, kept so existing operator habits keep working
    Empty,

    /// Rows whose last attempt failed
    Errors,
}

impl RunMode {
    /// Parses a mode string
    ///
    /// Only the exact lowercase names are recognised. Anything else, including
    /// differently cased or padded names, selects `All`, so parsing never fails.
    pub fn parse(s: &str) -> Self {
        match s {
            "all" => Self::All,
            "new" => Self::New,
            "empty" => Self::Empty,
            "errors" => Self::Errors,
            other => {
                tracing::debug!("Unknown run mode '{}', treating as \"all\"", other);
                Self::All
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::New => "new",
            Self::Empty => "empty",
            Self::Errors => "errors",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether a row needs (re)processing under the given mode
///
/// Pure and total: it sees only the stored `result` and `error` values.
pub fn should_process(mode: RunMode, stored_result: &str, stored_error: &str) -> bool {
    match mode {
        RunMode::All => true,
        RunMode::New | RunMode::Empty => stored_result.is_empty(),
        RunMode::Errors => stored_result == ERROR_RESULT || !stored_error.is_empty(),
    }
}
