//! Request and response bodies of the inspection endpoint
//!
//! Only the fields the rows store are modelled; everything else in the
//! response is ignored.

use crate::inspector::error::InspectionError;
use serde::{Deserialize, Serialize};

/// Language code sent with every request
pub const LANGUAGE_CODE: &str = "en-US";

/// JSON body of an inspection request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectRequest<'a> {
    pub inspection_url: &'a str,
    pub site_url: &'a str,
    pub language_code: &'a str,
}

impl<'a> InspectRequest<'a> {
    pub fn new(inspection_url: &'a str, site_url: &'a str) -> Self {
        Self {
            inspection_url,
            site_url,
            language_code: LANGUAGE_CODE,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InspectResponse {
    inspection_result: Option<InspectionResultBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InspectionResultBody {
    index_status_result: Option<IndexStatusResult>,
    mobile_usability_result: Option<MobileUsabilityResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexStatusResult {
    indexing_state: Option<String>,
    coverage_state: Option<String>,
    last_crawl_time: Option<String>,
    robots_txt_state: Option<String>,
    page_fetch_state: Option<String>,
    google_canonical: Option<String>,
    user_canonical: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MobileUsabilityResult {
    verdict: Option<String>,
}

/// Parsed inspection result for one URL
///
/// Absent sub-fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexInspection {
    pub indexing_state: String,
    pub coverage_state: String,
    pub last_crawl_time: String,
    pub robots_txt_state: String,
    pub page_fetch_state: String,
    pub mobile_usability: String,
    /// Provider-declared canonical, falling back to the user-declared one
    pub canonical_url: String,
}

impl From<InspectionResultBody> for IndexInspection {
    fn from(body: InspectionResultBody) -> Self {
        let index = body.index_status_result.unwrap_or_default();
        let mobile = body.mobile_usability_result.unwrap_or_default();

        let canonical_url = index
            .google_canonical
            .filter(|c| !c.is_empty())
            .or(index.user_canonical)
            .unwrap_or_default();

        Self {
            indexing_state: index.indexing_state.unwrap_or_default(),
            coverage_state: index.coverage_state.unwrap_or_default(),
            last_crawl_time: index.last_crawl_time.unwrap_or_default(),
            robots_txt_state: index.robots_txt_state.unwrap_or_default(),
            page_fetch_state: index.page_fetch_state.unwrap_or_default(),
            mobile_usability: mobile.verdict.unwrap_or_default(),
            canonical_url,
        }
    }
}

/// Parses a 2xx response body
///
/// # Returns
///
/// * `Ok(IndexInspection)` - body parsed and `inspectionResult` present
/// * `Err(InspectionError::MalformedResponse)` - anything else
pub fn parse_inspection_response(body: &str) -> Result<IndexInspection, InspectionError> {
    let response: InspectResponse = serde_json::from_str(body)
        .map_err(|e| InspectionError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    response
        .inspection_result
        .map(IndexInspection::from)
        .ok_or_else(|| {
            InspectionError::MalformedResponse("No inspectionResult in response".to_string())
        })
}
