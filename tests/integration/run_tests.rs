//! Run orchestration tests
//!
//! Drive whole runs with a scripted inspector and a clock that never sleeps,
//! then check what ended up in the rows and the log.

use crate::common::{
    fixed_time, seeded_store, Outcome, RecordingClock, ScriptedInspector, StopAfterPolls, SITE_URL,
};
use index_inspector::runner::{
    run_full_inspection, run_quick_check, InspectionRunner, RunKind, StopReason,
    INSPECTION_CATEGORY, LIMIT_CATEGORY, STOP_CATEGORY,
};
use index_inspector::state::{LogLevel, RunMode, SubjectRow};
use index_inspector::storage::{MemoryStore, RowStore};
use index_inspector::InspectorError;
use std::time::Duration;

const A: &str = "https://example.com/a";
const B: &str = "https://example.com/b";
const C: &str = "https://example.com/c";
const D: &str = "https://example.com/d";
const E: &str = "https://example.com/e";

fn inspected_row(url: &str, result: &str, error: &str) -> SubjectRow {
    SubjectRow {
        url: url.to_string(),
        result: result.to_string(),
        inspection_time: "2026-10-01T00:00:00.000Z".to_string(),
        error: error.to_string(),
        ..SubjectRow::default()
    }
}

#[tokio::test]
async fn test_budget_of_one_processes_first_row_only() {
    let store = seeded_store(&[A, B], "1", "0");
    let inspector = ScriptedInspector::new().with(A, Outcome::Indexed("INDEXED"));
    let clock = RecordingClock::new();

    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .log(&store)
        .stop_flag(&store)
        .clock(&clock)
        .build()
        .unwrap();

    let summary = run_full_inspection(&runner, Some("all")).await.unwrap();

    assert_eq!(summary.to_string(), "Processed 1 URLs in mode \"all\"");
    assert_eq!(summary.stop_reason, StopReason::LimitReached);
    assert_eq!(inspector.called_urls(), vec![A]);
    assert_eq!(inspector.site_urls(), vec![SITE_URL]);

    let a = store.read_row(0).unwrap().unwrap();
    assert_eq!(a.result, "INDEXED");
    assert_eq!(a.inspection_time, "2026-10-18T09:30:00.000Z");
    assert_eq!(a.error, "");

    let b = store.read_row(1).unwrap().unwrap();
    assert_eq!(b, SubjectRow::new(1, B));

    let logs = store.logs().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].category, INSPECTION_CATEGORY);
    assert_eq!(logs[0].level, LogLevel::Info);
    assert_eq!(logs[1].category, LIMIT_CATEGORY);
    assert!(logs[1].detail.contains("maxRequestsPerRun = 1"));
    assert!(logs[1].detail.contains(B));
}

#[tokio::test]
async fn test_budget_caps_api_calls() {
    let store = seeded_store(&[A, B, C, D, E], "2", "0");
    let inspector = ScriptedInspector::new();

    let clock = RecordingClock::new();
    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .log(&store)
        .clock(&clock)
        .build()
        .unwrap();

    let summary = run_full_inspection(&runner, None).await.unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(inspector.called_urls(), vec![A, B]);
    let rows = store.list_rows().unwrap();
    assert!(rows[2..].iter().all(|r| r.is_pristine()));
}

#[tokio::test]
async fn test_stop_request_ends_run_between_rows() {
    let store = seeded_store(&[A, B, C], "100", "0");
    let inspector = ScriptedInspector::new();
    let stop = StopAfterPolls::new(1);

    let clock = RecordingClock::new();
    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .log(&store)
        .stop_flag(&stop)
        .clock(&clock)
        .build()
        .unwrap();

    let summary = run_full_inspection(&runner, Some("all")).await.unwrap();

    assert!(stop.was_cleared());
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.stop_reason, StopReason::StopRequested);
    assert_eq!(inspector.called_urls(), vec![A]);
    assert!(store.read_row(1).unwrap().unwrap().is_pristine());

    let logs = store.logs().unwrap();
    let last = logs.last().unwrap();
    assert_eq!(last.category, STOP_CATEGORY);
    assert_eq!(last.level, LogLevel::Info);
}

#[tokio::test]
async fn test_stale_stop_request_is_cleared_at_start() {
    use index_inspector::storage::StopFlag;

    let store = seeded_store(&[A, B], "100", "0");
    store.request_stop().unwrap();
    let inspector = ScriptedInspector::new();

    let clock = RecordingClock::new();
    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .stop_flag(&store)
        .clock(&clock)
        .build()
        .unwrap();

    let summary = run_quick_check(&runner, None).await.unwrap();
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.stop_reason, StopReason::Completed);
}

#[tokio::test]
async fn test_new_mode_with_everything_inspected() {
    let store = MemoryStore::new();
    store.push_row(inspected_row(A, "INDEXED", "")).unwrap();
    store.push_row(inspected_row(B, "ERROR", "HTTP 500 boom")).unwrap();
    store.set_setting("siteUrl", SITE_URL).unwrap();
    let inspector = ScriptedInspector::new();

    let clock = RecordingClock::new();
    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .log(&store)
        .clock(&clock)
        .build()
        .unwrap();

    let summary = run_quick_check(&runner, None).await.unwrap();

    assert_eq!(summary.kind, RunKind::Quick);
    assert_eq!(summary.mode, RunMode::New);
    assert_eq!(summary.to_string(), "No URLs matched mode \"new\"");
    assert!(inspector.called_urls().is_empty());
    assert!(store.logs().unwrap().is_empty());
}

#[tokio::test]
async fn test_errors_mode_retries_failed_rows_only() {
    let store = MemoryStore::new();
    store.push_row(inspected_row(A, "INDEXED", "")).unwrap();
    store.push_row(inspected_row(B, "ERROR", "HTTP 500 boom")).unwrap();
    store.push_row(SubjectRow::new(0, C)).unwrap();
    store.push_row(inspected_row(D, "ERROR", "Transport error: reset")).unwrap();
    store.set_setting("siteUrl", SITE_URL).unwrap();
    store.set_setting("delayMs", "0").unwrap();
    let inspector = ScriptedInspector::new();

    let clock = RecordingClock::new();
    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .clock(&clock)
        .build()
        .unwrap();

    let summary = run_full_inspection(&runner, Some("errors")).await.unwrap();

    assert_eq!(summary.mode, RunMode::Errors);
    assert_eq!(inspector.called_urls(), vec![B, D]);
    assert!(store.read_row(2).unwrap().unwrap().is_pristine());
    assert_eq!(store.read_row(1).unwrap().unwrap().error, "");
}

#[tokio::test]
async fn test_empty_mode_selects_like_new() {
    let store = MemoryStore::new();
    store.push_row(inspected_row(A, "INDEXED", "")).unwrap();
    store.push_row(SubjectRow::new(0, B)).unwrap();
    store.set_setting("siteUrl", SITE_URL).unwrap();
    let inspector = ScriptedInspector::new();

    let clock = RecordingClock::new();
    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .clock(&clock)
        .build()
        .unwrap();

    let summary = run_full_inspection(&runner, Some("empty")).await.unwrap();

    assert_eq!(summary.mode.to_string(), "empty");
    assert_eq!(inspector.called_urls(), vec![B]);
}

#[tokio::test]
async fn test_unknown_mode_means_all() {
    let store = MemoryStore::new();
    store.push_row(inspected_row(A, "INDEXED", "")).unwrap();
    store.push_row(SubjectRow::new(0, B)).unwrap();
    store.set_setting("siteUrl", SITE_URL).unwrap();
    let inspector = ScriptedInspector::new();

    let clock = RecordingClock::new();
    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .clock(&clock)
        .build()
        .unwrap();

    let summary = run_quick_check(&runner, Some("everything")).await.unwrap();

    assert_eq!(summary.mode, RunMode::All);
    assert_eq!(inspector.called_urls(), vec![A, B]);
}

#[tokio::test]
async fn test_uppercase_mode_name_means_all() {
    let store = MemoryStore::new();
    store.push_row(inspected_row(A, "INDEXED", "")).unwrap();
    store.push_row(inspected_row(B, "ERROR", "HTTP 500 boom")).unwrap();
    store.set_setting("siteUrl", SITE_URL).unwrap();
    store.set_setting("delayMs", "0").unwrap();
    let inspector = ScriptedInspector::new();

    let clock = RecordingClock::new();
    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .clock(&clock)
        .build()
        .unwrap();

    let summary = run_full_inspection(&runner, Some("ERRORS")).await.unwrap();

    assert_eq!(summary.mode, RunMode::All);
    assert_eq!(inspector.called_urls(), vec![A, B]);
}

#[tokio::test]
async fn test_failures_are_recorded_and_run_continues() {
    let store = seeded_store(&[A, B, C], "100", "0");
    let inspector = ScriptedInspector::new().with(B, Outcome::Http(403, "forbidden"));

    let clock = RecordingClock::new();
    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .log(&store)
        .clock(&clock)
        .build()
        .unwrap();

    let summary = run_full_inspection(&runner, Some("all")).await.unwrap();

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);

    let b = store.read_row(1).unwrap().unwrap();
    assert_eq!(b.result, "ERROR");
    assert_eq!(b.error, "HTTP 403 forbidden");
    assert_eq!(b.coverage_state, "");
    assert_eq!(b.inspection_time, "2026-10-18T09:30:00.000Z");

    // error is non-empty exactly when result is ERROR
    for row in store.list_rows().unwrap() {
        assert_eq!(row.result == "ERROR", !row.error.is_empty(), "row {}", row.url);
    }

    // one log entry per processed row
    let logs = store.logs().unwrap();
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[1].level, LogLevel::Error);
    assert_eq!(logs[1].detail, format!("Failed for {}: HTTP 403 forbidden", B));
    assert!(logs.iter().all(|l| l.timestamp == fixed_time()));
}

#[tokio::test]
async fn test_success_clears_previous_error() {
    let store = MemoryStore::new();
    store.push_row(inspected_row(A, "ERROR", "HTTP 500 boom")).unwrap();
    store.set_setting("siteUrl", SITE_URL).unwrap();
    let inspector = ScriptedInspector::new().with(A, Outcome::Indexed("INDEXING_ALLOWED"));

    let clock = RecordingClock::new();
    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .clock(&clock)
        .build()
        .unwrap();

    run_full_inspection(&runner, Some("errors")).await.unwrap();

    let a = store.read_row(0).unwrap().unwrap();
    assert_eq!(a.result, "INDEXING_ALLOWED");
    assert_eq!(a.error, "");
    assert_eq!(a.coverage_state, "Submitted and indexed");
}

#[tokio::test]
async fn test_repeated_full_runs_are_idempotent() {
    let store = seeded_store(&[A, B], "100", "0");
    let inspector = ScriptedInspector::new();

    let clock = RecordingClock::new();
    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .clock(&clock)
        .build()
        .unwrap();

    run_full_inspection(&runner, None).await.unwrap();
    let first = store.list_rows().unwrap();
    run_full_inspection(&runner, None).await.unwrap();
    let second = store.list_rows().unwrap();

    assert_eq!(first, second);
    assert_eq!(inspector.called_urls(), vec![A, B, A, B]);
}

#[tokio::test]
async fn test_missing_site_url_fails_before_any_row() {
    let store = MemoryStore::with_urls([A, B]);
    store.set_setting("siteUrl", "   ").unwrap();
    let inspector = ScriptedInspector::new();

    let clock = RecordingClock::new();
    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .log(&store)
        .clock(&clock)
        .build()
        .unwrap();

    let result = run_full_inspection(&runner, None).await;

    assert!(matches!(result, Err(InspectorError::MissingSiteUrl)));
    assert!(inspector.called_urls().is_empty());
    assert!(store.list_rows().unwrap().iter().all(|r| r.is_pristine()));
    assert!(store.logs().unwrap().is_empty());
}

#[tokio::test]
async fn test_rows_without_url_are_skipped() {
    let store = seeded_store(&[A, "", "   ", B], "2", "0");
    let inspector = ScriptedInspector::new();

    let clock = RecordingClock::new();
    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .log(&store)
        .clock(&clock)
        .build()
        .unwrap();

    let summary = run_full_inspection(&runner, None).await.unwrap();

    // blank rows consume no budget
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.stop_reason, StopReason::Completed);
    assert_eq!(inspector.called_urls(), vec![A, B]);
    assert!(store.read_row(1).unwrap().unwrap().is_pristine());
}

#[tokio::test]
async fn test_delay_is_applied_after_each_call() {
    let store = seeded_store(&[A, B, C], "100", "250");
    let clock = RecordingClock::new();
    let inspector = ScriptedInspector::new().with(B, Outcome::Http(500, "boom"));

    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .clock(&clock)
        .build()
        .unwrap();

    run_full_inspection(&runner, None).await.unwrap();

    assert_eq!(clock.sleeps(), vec![Duration::from_millis(250); 3]);
}

#[tokio::test]
async fn test_invalid_settings_fall_back_to_defaults() {
    let store = seeded_store(&[A], "zero", "-5");
    let clock = RecordingClock::new();
    let inspector = ScriptedInspector::new();

    let runner = InspectionRunner::builder(&inspector)
        .rows(&store)
        .settings(&store)
        .clock(&clock)
        .build()
        .unwrap();

    let summary = run_full_inspection(&runner, None).await.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(1100)]);
}
