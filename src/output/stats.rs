//! Statistics over the subject rows
//!
//! This module summarises what the row store currently holds: how many URLs
//! are tracked, how many were never inspected, how many failed last time, and
//! the spread of result tokens.

use crate::storage::RowStore;
use crate::InspectorError;
use std::collections::HashMap;

/// Row statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowStatistics {
    /// Rows with a non-empty URL
    pub total_urls: u64,

    /// Rows with a URL and no recorded attempt
    pub never_inspected: u64,

    /// Rows whose last attempt failed
    pub errors: u64,

    /// Count of rows per stored `result` token, excluding never-inspected rows
    pub by_result: HashMap<String, u64>,

    /// Most recent `inspectionTime` across all rows
    pub last_inspection: Option<String>,
}

/// Loads statistics from a row store
///
/// # Arguments
///
/// * `rows` - The row store to summarise
///
/// # Returns
///
/// * `Ok(RowStatistics)` - Successfully computed statistics
/// * `Err(InspectorError)` - Failed to read rows
pub fn load_statistics(rows: &dyn RowStore) -> Result<RowStatistics, InspectorError> {
    let mut stats = RowStatistics::default();

    for row in rows.list_rows()? {
        if row.url.trim().is_empty() {
            continue;
        }
        stats.total_urls += 1;

        if row.is_pristine() {
            stats.never_inspected += 1;
            continue;
        }
        if row.is_error() {
            stats.errors += 1;
        }
        if !row.result.trim().is_empty() {
            *stats.by_result.entry(row.result.clone()).or_insert(0) += 1;
        }

        // RFC 3339 timestamps in UTC sort lexically
        if !row.inspection_time.is_empty()
            && stats
                .last_inspection
                .as_deref()
                .map_or(true, |last| row.inspection_time.as_str() > last)
        {
            stats.last_inspection = Some(row.inspection_time.clone());
        }
    }

    Ok(stats)
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &RowStatistics) {
    println!("=== Inspection Status ===\n");

    println!("Overview:");
    println!("  Tracked URLs: {}", stats.total_urls);
    println!("  Never inspected: {}", stats.never_inspected);
    println!("  Last attempt failed: {}", stats.errors);
    if let Some(last) = &stats.last_inspection {
        println!("  Last inspection: {}", last);
    }
    println!();

    if !stats.by_result.is_empty() {
        println!("Rows by Result:");
        // Sort results by count (descending), then name
        let mut result_counts: Vec<_> = stats.by_result.iter().collect();
        result_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (result, count) in result_counts {
            let percentage = if stats.total_urls > 0 {
                (*count as f64 / stats.total_urls as f64) * 100.0
            } else {
                0.0
            };
            println!("  {}: {} ({:.1}%)", result, count, percentage);
        }
        println!();
    }

    let inspected = stats.total_urls - stats.never_inspected;
    let success_rate = if inspected > 0 {
        ((inspected - stats.errors) as f64 / inspected as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} inspected URLs without error)",
        success_rate,
        inspected - stats.errors,
        inspected
    );
}
