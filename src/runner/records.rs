//! Result record builders
//!
//! Turn an inspection outcome into the full set of row fields to persist.
//! Writing the record is the orchestrator's job.

use crate::inspector::{IndexInspection, InspectionError};
use crate::state::{RowUpdate, ERROR_RESULT};
use chrono::{DateTime, Utc};

/// Result token used when the provider reports neither indexing nor coverage state
pub const OK_RESULT: &str = "OK";

/// Builds the row update for a successful inspection
///
/// `result` is the indexing state, else the coverage state, else `OK`.
pub fn build_success_record(inspection: &IndexInspection, inspected_at: DateTime<Utc>) -> RowUpdate {
    let result = [&inspection.indexing_state, &inspection.coverage_state]
        .into_iter()
        .find(|s| !s.is_empty())
        .cloned()
        .unwrap_or_else(|| OK_RESULT.to_string());

    RowUpdate {
        result,
        indexing_state: inspection.indexing_state.clone(),
        coverage_state: inspection.coverage_state.clone(),
        last_crawl_time: inspection.last_crawl_time.clone(),
        robots_txt_state: inspection.robots_txt_state.clone(),
        page_fetch_state: inspection.page_fetch_state.clone(),
        mobile_usability: inspection.mobile_usability.clone(),
        canonical_url: inspection.canonical_url.clone(),
        inspection_time: inspected_at,
        error: String::new(),
    }
}

/// Builds the row update for a failed inspection
///
/// All provider fields are cleared; `error` carries the failure message.
pub fn build_error_record(error: &InspectionError, inspected_at: DateTime<Utc>) -> RowUpdate {
    RowUpdate {
        result: ERROR_RESULT.to_string(),
        indexing_state: String::new(),
        coverage_state: String::new(),
        last_crawl_time: String::new(),
        robots_txt_state: String::new(),
        page_fetch_state: String::new(),
        mobile_usability: String::new(),
        canonical_url: String::new(),
        inspection_time: inspected_at,
        error: error.to_string(),
    }
}
