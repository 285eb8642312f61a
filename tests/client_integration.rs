//! Integration tests for `LoggedClient` with logging hooks attached.
//!
//! These tests run real exchanges against a mock HTTP server.

use std::path::{Path, PathBuf};
use std::time::Duration;

use exchange_log::{
    Body, ClientError, ErrorDetails, LoggedClient, LoggerConfig, attach,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn logged_client(dir: &Path) -> LoggedClient {
    let mut client = LoggedClient::new().expect("client should build");
    attach(&mut client, LoggerConfig::new(dir).with_host("ci-runner"));
    client
}

fn files_ending(dir: &Path, suffix: &str) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut found: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.to_string_lossy().ends_with(suffix))
        .collect();
    found.sort();
    found
}

fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("should read log file");
    serde_json::from_str(&text).expect("log file should be JSON")
}

#[tokio::test]
async fn test_json_exchange_writes_request_metadata_and_data() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/player"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let client = logged_client(temp_dir.path());

    let url = format!("{}/v1/player?id=7", mock_server.uri());
    let response = client.execute(client.get(&url)).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.status_text, "OK");
    assert_eq!(response.body, Body::Json(json!({"id": 7})));

    let req = files_ending(temp_dir.path(), "_ci_runner_v1_player_req.json");
    assert_eq!(req.len(), 1);
    let req_doc = read_json(&req[0]);
    assert_eq!(req_doc["method"], "GET");
    assert_eq!(req_doc["url"], url);

    let meta = files_ending(temp_dir.path(), "_v1_player_res.json");
    assert_eq!(meta.len(), 1);
    assert_eq!(read_json(&meta[0])["status"], 200);

    let data = files_ending(temp_dir.path(), "_v1_player_res_data.json");
    assert_eq!(data.len(), 1);
    assert_eq!(read_json(&data[0]), json!({"id": 7}));
}

#[tokio::test]
async fn test_html_response_is_written_raw() {
    let mock_server = MockServer::start().await;
    let page = "<!DOCTYPE html><html><body>docs</body></html>";
    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page, "text/html"))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let client = logged_client(temp_dir.path());

    let response = client
        .execute(client.get(format!("{}/docs", mock_server.uri())))
        .await
        .unwrap();

    assert_eq!(response.body, Body::Text(page.to_string()));
    let html = files_ending(temp_dir.path(), "_docs_res.html");
    assert_eq!(html.len(), 1);
    assert_eq!(std::fs::read_to_string(&html[0]).unwrap(), page);
    assert!(files_ending(temp_dir.path(), "_res_data.json").is_empty());
}

#[tokio::test]
async fn test_post_json_forwards_headers_and_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header("x-trace-id", "abc"))
        .and(body_json(json!({"sku": "A-1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let client = logged_client(temp_dir.path());

    let request = client
        .post_json(format!("{}/orders", mock_server.uri()), json!({"sku": "A-1"}))
        .header("X-Trace-Id", "abc")
        .log_as("create order");
    let response = client.execute(request).await.unwrap();

    assert_eq!(response.status, 201);
    let req = files_ending(temp_dir.path(), "_create_order_req.json");
    assert_eq!(req.len(), 1);
    let doc = read_json(&req[0]);
    assert_eq!(doc["method"], "POST");
    assert_eq!(doc["body"], json!({"sku": "A-1"}));
    assert_eq!(doc["headers"]["x-trace-id"], "abc");
}

#[tokio::test]
async fn test_server_error_is_resurfaced_and_logged() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "database unavailable"})),
        )
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let client = logged_client(temp_dir.path());

    let result = client
        .execute(client.get(format!("{}/flaky", mock_server.uri())))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, ClientError::Status { .. }));
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.code(), Some("ERR_BAD_RESPONSE"));

    assert!(files_ending(temp_dir.path(), "_res.json").is_empty());
    let err_files = files_ending(temp_dir.path(), "_flaky_err.json");
    assert_eq!(err_files.len(), 1);
    let doc = read_json(&err_files[0]);
    assert_eq!(doc["status"], 500);
    assert_eq!(doc["statusText"], "Internal Server Error");
    assert_eq!(doc["code"], "ERR_BAD_RESPONSE");
    assert_eq!(doc["data"], json!({"error": "database unavailable"}));
    assert!(doc["message"].as_str().unwrap().contains("status 500"));
}

#[tokio::test]
async fn test_client_error_status_can_be_returned_as_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut client = LoggedClient::new().unwrap().error_for_status(false);
    attach(&mut client, LoggerConfig::new(temp_dir.path()).with_host("h"));

    let response = client
        .execute(client.get(format!("{}/missing", mock_server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.body, Body::Empty);
    assert_eq!(files_ending(temp_dir.path(), "_missing_res.json").len(), 1);
    assert!(files_ending(temp_dir.path(), "_err.json").is_empty());
}

#[tokio::test]
async fn test_timeout_is_logged_with_timeout_code() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let inner = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let mut client = LoggedClient::from_client(inner);
    attach(&mut client, LoggerConfig::new(temp_dir.path()).with_host("h"));

    let err = client
        .execute(client.get(format!("{}/slow", mock_server.uri())))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Transport { .. }));
    assert_eq!(err.code(), Some("ETIMEDOUT"));
    let err_files = files_ending(temp_dir.path(), "_slow_err.json");
    assert_eq!(err_files.len(), 1);
    let doc = read_json(&err_files[0]);
    assert_eq!(doc["code"], "ETIMEDOUT");
    assert!(doc["status"].is_null());
    assert!(doc["data"].is_null());
}

#[tokio::test]
async fn test_invalid_method_is_logged_as_error() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let client = logged_client(temp_dir.path());

    let err = client
        .execute(client.request("NOT A METHOD", "http://127.0.0.1:9/x"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidMethod { .. }));
    assert_eq!(files_ending(temp_dir.path(), "_x_err.json").len(), 1);
}

#[tokio::test]
async fn test_skip_log_sends_request_without_artifacts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quiet"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let log_dir = temp_dir.path().join("logs");
    let client = logged_client(&log_dir);

    let response = client
        .execute(client.get(format!("{}/quiet", mock_server.uri())).skip_log())
        .await
        .unwrap();

    assert_eq!(response.body, Body::Text("ok".to_string()));
    assert!(!log_dir.exists());
}

#[tokio::test]
async fn test_concurrent_exchanges_keep_separate_contexts() {
    let mock_server = MockServer::start().await;
    for name in ["alpha", "beta", "gamma"] {
        Mock::given(method("GET"))
            .and(path(format!("/{name}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": name })))
            .mount(&mock_server)
            .await;
    }
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let client = logged_client(temp_dir.path());

    let (a, b, c) = tokio::join!(
        client.execute(client.get(format!("{}/alpha", mock_server.uri()))),
        client.execute(client.get(format!("{}/beta", mock_server.uri()))),
        client.execute(client.get(format!("{}/gamma", mock_server.uri()))),
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());

    for name in ["alpha", "beta", "gamma"] {
        let data = files_ending(temp_dir.path(), &format!("_{name}_res_data.json"));
        assert_eq!(data.len(), 1, "missing data file for {name}");
        assert_eq!(read_json(&data[0]), json!({ "name": name }));
    }
}
