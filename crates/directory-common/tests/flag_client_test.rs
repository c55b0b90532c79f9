// Integration tests for `FlagClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use directory_common::flag::{FlagClient, FlagClientConfig, FlagError};

async fn setup() -> (MockServer, FlagClient) {
    let server = MockServer::start().await;
    let config = FlagClientConfig {
        webhook_url: format!("{}/hooks/flag", server.uri()),
        timeout: Duration::from_secs(2),
    };
    let client = FlagClient::with_client(reqwest::Client::new(), config);
    (server, client)
}

#[tokio::test]
async fn flag_success_on_json_response() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/hooks/flag"))
        .and(query_param("Resource", "[rec123]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.flag_resource("rec123").await.unwrap();
}

#[tokio::test]
async fn flag_accepts_any_json_payload() {
    let (server, client) = setup().await;

    // No payload schema is consumed; an empty object is enough.
    Mock::given(method("GET"))
        .and(path("/hooks/flag"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    client.flag_resource("recXYZ").await.unwrap();
}

#[tokio::test]
async fn flag_rejects_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/hooks/flag"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.flag_resource("rec123").await;
    assert!(
        matches!(result, Err(FlagError::Webhook { ref status, .. }) if status.as_u16() == 500),
        "expected Webhook error, got: {result:?}"
    );
}

#[tokio::test]
async fn flag_rejects_non_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/hooks/flag"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>thanks</html>"))
        .mount(&server)
        .await;

    let result = client.flag_resource("rec123").await;
    assert!(
        matches!(result, Err(FlagError::InvalidJson(_))),
        "expected InvalidJson error, got: {result:?}"
    );
}

#[tokio::test]
async fn flag_reports_connection_failure() {
    // Point at a server that is already gone.
    let server = MockServer::start().await;
    let config = FlagClientConfig {
        webhook_url: format!("{}/hooks/flag", server.uri()),
        timeout: Duration::from_secs(2),
    };
    drop(server);
    let client = FlagClient::with_client(reqwest::Client::new(), config);

    let result = client.flag_resource("rec123").await;
    assert!(
        matches!(result, Err(FlagError::Request(_))),
        "expected Request error, got: {result:?}"
    );
}
