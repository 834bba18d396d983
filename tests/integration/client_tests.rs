//! Inspection client tests against a mock endpoint

use index_inspector::config::ApiConfig;
use index_inspector::inspector::{
    CredentialError, EnvToken, InspectionClient, InspectionError, Inspector, StaticToken,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INSPECT_PATH: &str = "/v1/urlInspection/index:inspect";

fn client_for(server: &MockServer) -> InspectionClient {
    let config = ApiConfig {
        endpoint: format!("{}{}", server.uri(), INSPECT_PATH),
        timeout_secs: 5,
        ..ApiConfig::default()
    };
    InspectionClient::from_config(&config, Box::new(StaticToken::new("tok")))
        .expect("Failed to build client")
}

#[tokio::test]
async fn test_inspect_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INSPECT_PATH))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({
            "inspectionUrl": "https://example.com/a",
            "siteUrl": "sc-domain:example.com",
            "languageCode": "en-US"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "inspectionResult": {
                "indexStatusResult": {
                    "verdict": "PASS",
                    "coverageState": "Submitted and indexed",
                    "indexingState": "INDEXING_ALLOWED",
                    "lastCrawlTime": "2026-10-01T08:00:00Z",
                    "robotsTxtState": "ALLOWED",
                    "pageFetchState": "SUCCESSFUL",
                    "googleCanonical": "https://example.com/a",
                    "userCanonical": "https://example.com/a?ref=x"
                },
                "mobileUsabilityResult": { "verdict": "PASS" }
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let inspection = client_for(&mock_server)
        .inspect("https://example.com/a", "sc-domain:example.com")
        .await
        .expect("Inspection should succeed");

    assert_eq!(inspection.indexing_state, "INDEXING_ALLOWED");
    assert_eq!(inspection.coverage_state, "Submitted and indexed");
    assert_eq!(inspection.last_crawl_time, "2026-10-01T08:00:00Z");
    assert_eq!(inspection.robots_txt_state, "ALLOWED");
    assert_eq!(inspection.page_fetch_state, "SUCCESSFUL");
    assert_eq!(inspection.mobile_usability, "PASS");
    assert_eq!(inspection.canonical_url, "https://example.com/a");
}

#[tokio::test]
async fn test_inspect_canonical_falls_back_to_user_declared() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INSPECT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "inspectionResult": {
                "indexStatusResult": {
                    "coverageState": "Discovered - currently not indexed",
                    "userCanonical": "https://example.com/b"
                }
            }
        })))
        .mount(&mock_server)
        .await;

    let inspection = client_for(&mock_server)
        .inspect("https://example.com/b", "sc-domain:example.com")
        .await
        .unwrap();

    assert_eq!(inspection.indexing_state, "");
    assert_eq!(inspection.canonical_url, "https://example.com/b");
    assert_eq!(inspection.mobile_usability, "");
}

#[tokio::test]
async fn test_inspect_http_error_keeps_raw_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INSPECT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .inspect("https://example.com/a", "sc-domain:example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, InspectionError::ApiHttp { status: 500, .. }));
    assert_eq!(err.to_string(), "HTTP 500 server error");
}

#[tokio::test]
async fn test_inspect_quota_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INSPECT_PATH))
        .respond_with(
            ResponseTemplate::new(429).set_body_string(r#"{"error":{"code":429}}"#),
        )
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .inspect("https://example.com/a", "sc-domain:example.com")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), r#"HTTP 429 {"error":{"code":429}}"#);
}

#[tokio::test]
async fn test_inspect_missing_inspection_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INSPECT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "other": 1 })))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .inspect("https://example.com/a", "sc-domain:example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, InspectionError::MalformedResponse(_)));
    assert_eq!(
        err.to_string(),
        "Malformed response: No inspectionResult in response"
    );
}

#[tokio::test]
async fn test_inspect_non_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(INSPECT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .inspect("https://example.com/a", "sc-domain:example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, InspectionError::MalformedResponse(_)));
    assert!(err.to_string().contains("invalid JSON"));
}

#[tokio::test]
async fn test_inspect_transport_failure() {
    // Nothing listens on port 1
    let client = InspectionClient::new(
        reqwest::Client::new(),
        "http://127.0.0.1:1/v1/urlInspection/index:inspect",
        Box::new(StaticToken::new("tok")),
    );

    let err = client
        .inspect("https://example.com/a", "sc-domain:example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, InspectionError::Transport(_)));
}

#[tokio::test]
async fn test_inspect_credential_failure_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = InspectionClient::new(
        reqwest::Client::new(),
        format!("{}{}", mock_server.uri(), INSPECT_PATH),
        Box::new(EnvToken::new("INDEX_INSPECTOR_TEST_TOKEN_NEVER_SET")),
    );

    let err = client
        .inspect("https://example.com/a", "sc-domain:example.com")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InspectionError::Credential(CredentialError::MissingEnv(_))
    ));
}
