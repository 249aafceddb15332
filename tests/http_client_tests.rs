//! Integration tests for the HTTP transport.
//!
//! These tests verify default headers, query handling, the request record
//! attached to every response, response body parsing, and error mapping.

use std::collections::HashMap;

use hal_api::clients::{HttpClient, HttpMethod, HttpRequest, Transport};
use hal_api::{AccessToken, ApiBaseUrl, HalConfig, HttpError, InvalidHttpRequestError, QueryParams};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a client for the mock server.
fn create_client(server: &MockServer) -> HttpClient {
    let config = HalConfig::builder()
        .base_url(ApiBaseUrl::new(server.uri()).unwrap())
        .access_token(AccessToken::new("test-token").unwrap())
        .user_agent_prefix("integration-tests")
        .build()
        .unwrap();
    HttpClient::new(&config).unwrap()
}

// ============================================================================
// Requests
// ============================================================================

#[tokio::test]
async fn test_get_merges_href_query_with_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apps"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_links": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let params: QueryParams = [("per_page", "50")].into_iter().collect();
    let response = client
        .get(&format!("{}/apps?page=2", server.uri()), &HashMap::new(), &params)
        .await
        .unwrap();

    assert_eq!(response.request.method, HttpMethod::Get);
    assert_eq!(response.request.url.path(), "/apps");
    assert!(response.request.url.query().is_none());
    assert_eq!(response.request.query.get("page"), Some("2"));
    assert_eq!(response.request.query.get("per_page"), Some("50"));
}

#[tokio::test]
async fn test_default_and_extra_headers_are_sent_and_recorded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("x-trace", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_links": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let headers = HashMap::from([("X-Trace".to_string(), "abc".to_string())]);
    let response = client
        .get(&format!("{}/", server.uri()), &headers, &QueryParams::new())
        .await
        .unwrap();

    let recorded = &response.request.headers;
    assert_eq!(recorded.get("X-Trace"), Some(&"abc".to_string()));
    assert!(recorded
        .get("User-Agent")
        .unwrap()
        .starts_with("integration-tests | HAL API Library v"));
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/backups"))
        .and(wiremock::matchers::body_json(json!({"type": "manual"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_type": "backup"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let response = client
        .post(
            &format!("{}/backups", server.uri()),
            &HashMap::new(),
            &json!({"type": "manual"}),
        )
        .await
        .unwrap();

    assert_eq!(response.code, 201);
    assert_eq!(response.body["_type"], "backup");
}

#[tokio::test]
async fn test_relative_url_is_rejected_before_sending() {
    let server = MockServer::start().await;
    let client = create_client(&server);

    let request = HttpRequest::builder(HttpMethod::Get, "/apps").build().unwrap();
    let error = client.request(request).await.unwrap_err();

    assert!(matches!(
        error,
        HttpError::InvalidRequest(InvalidHttpRequestError::InvalidUrl { .. })
    ));
}

// ============================================================================
// Responses
// ============================================================================

#[tokio::test]
async fn test_empty_body_parses_to_null() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/operations"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let response = client
        .post(
            &format!("{}/operations", server.uri()),
            &HashMap::new(),
            &json!({}),
        )
        .await
        .unwrap();

    assert!(response.is_empty());
    assert!(response.body.is_null());
}

#[tokio::test]
async fn test_server_error_keeps_raw_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apps"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let error = client
        .get(&format!("{}/apps", server.uri()), &HashMap::new(), &QueryParams::new())
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(503));
    assert!(error.to_string().contains("upstream unavailable"));
}

#[tokio::test]
async fn test_client_error_includes_request_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apps/1"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("X-Request-Id", "req-123")
                .set_body_json(json!({"error": "forbidden"})),
        )
        .mount(&server)
        .await;

    let client = create_client(&server);
    let error = client
        .get(&format!("{}/apps/1", server.uri()), &HashMap::new(), &QueryParams::new())
        .await
        .unwrap_err();

    let HttpError::Response(response) = error else {
        panic!("expected a response error");
    };
    assert_eq!(response.code, 403);
    assert!(response.message.contains("forbidden"));
    assert!(response.message.contains("req-123"));
    assert_eq!(response.error_reference.as_deref(), Some("req-123"));
}

#[tokio::test]
async fn test_non_json_success_body_is_preserved() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apps"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway login</html>"))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let response = client
        .get(&format!("{}/apps", server.uri()), &HashMap::new(), &QueryParams::new())
        .await
        .unwrap();

    assert_eq!(response.code, 200);
    assert!(!response.is_empty());
    assert_eq!(response.body["raw_body"], "<html>gateway login</html>");
}

#[tokio::test]
async fn test_non_json_client_error_body_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apps"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let error = client
        .get(&format!("{}/apps", server.uri()), &HashMap::new(), &QueryParams::new())
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(401));
    assert!(error.to_string().contains("Unauthorized"));
}
