//! Per-run settings resolved from the key/value settings store
//!
//! The snapshot is read once at the start of a run. `siteUrl` is mandatory;
//! the numeric knobs fall back to their defaults whenever the stored value is
//! missing, unparsable or out of range.

use crate::InspectorError;
use std::collections::HashMap;
use std::num::IntErrorKind;
use std::time::Duration;

/// Settings key holding the Search Console property
pub const SITE_URL_KEY: &str = "siteUrl";

/// Settings key holding the per-run request budget
pub const MAX_REQUESTS_KEY: &str = "maxRequestsPerRun";

/// Settings key holding the pause between requests, in milliseconds
pub const DELAY_MS_KEY: &str = "delayMs";

pub const DEFAULT_MAX_REQUESTS_PER_RUN: u32 = 100;
pub const DEFAULT_DELAY_MS: u64 = 1100;

/// Immutable settings for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Inspection scope passed to the API with every request
    pub site_url: String,

    /// Maximum number of API calls this run may make
    pub max_requests_per_run: u32,

    /// Pause after each API call
    pub delay: Duration,
}

impl RunSettings {
    /// Resolves run settings from a raw snapshot
    ///
    /// # Returns
    ///
    /// * `Ok(RunSettings)` - `siteUrl` present, defaults applied where needed
    /// * `Err(InspectorError::MissingSiteUrl)` - `siteUrl` absent or blank
    pub fn from_snapshot(snapshot: &HashMap<String, String>) -> Result<Self, InspectorError> {
        let site_url = snapshot
            .get(SITE_URL_KEY)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or(InspectorError::MissingSiteUrl)?
            .to_string();

        let max_requests_per_run = snapshot
            .get(MAX_REQUESTS_KEY)
            .and_then(|v| parse_request_budget(v))
            .unwrap_or_else(|| {
                tracing::debug!(
                    "Using default {} = {}",
                    MAX_REQUESTS_KEY,
                    DEFAULT_MAX_REQUESTS_PER_RUN
                );
                DEFAULT_MAX_REQUESTS_PER_RUN
            });

        let delay_ms = snapshot
            .get(DELAY_MS_KEY)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|n| *n >= 0)
            .map(|n| n as u64)
            .unwrap_or_else(|| {
                tracing::debug!("Using default {} = {}", DELAY_MS_KEY, DEFAULT_DELAY_MS);
                DEFAULT_DELAY_MS
            });

        Ok(Self {
            site_url,
            max_requests_per_run,
            delay: Duration::from_millis(delay_ms),
        })
    }
}

/// Parses a positive request budget, saturating at `u32::MAX`
fn parse_request_budget(value: &str) -> Option<u32> {
    match value.trim().parse::<i128>() {
        Ok(n) if n > 0 => Some(u32::try_from(n).unwrap_or(u32::MAX)),
        Ok(_) => None,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u32::MAX),
        Err(_) => None,
    }
}
