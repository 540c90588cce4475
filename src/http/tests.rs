//! Tests for the HTTP client module

use super::*;
use crate::auth::{AuthConfig, AuthProvider};
use crate::config::RateLimitConfig;
use crate::error::Error;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ApiClient {
    test_client_with(ClientConfig::new(base_url).no_rate_limit(), base_url)
}

fn test_client_with(config: ClientConfig, auth_base_url: &str) -> ApiClient {
    let auth = Arc::new(AuthProvider::new(
        AuthConfig::ApiKey {
            key: "test-key".to_string(),
            header_name: "X-API-Key".to_string(),
        },
        auth_base_url,
    ));
    ApiClient::new(config, auth)
}

#[test]
fn test_client_config_defaults() {
    let config = ClientConfig::new("https://api.example.com");
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.initial_backoff, Duration::from_secs(1));
    assert!(config.rate_limit.is_some());
}

#[test]
fn test_request_options_builder() {
    let opts = RequestOptions::new()
        .query("q", "London")
        .query("units", "metric")
        .header("X-Request-Id", "abc123")
        .json(serde_json::json!({"key": "value"}));

    assert_eq!(opts.query.get("q"), Some(&"London".to_string()));
    assert_eq!(opts.query.get("units"), Some(&"metric".to_string()));
    assert_eq!(
        opts.headers.get("X-Request-Id"),
        Some(&"abc123".to_string())
    );
    assert!(opts.body.is_some());
}

#[tokio::test]
async fn test_get_parses_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "London",
            "main": {"temp": 15.5}
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let body = client.get("/weather", RequestOptions::new()).await.unwrap();

    assert_eq!(body["name"], "London");
    assert_eq!(body["main"]["temp"], 15.5);
}

#[tokio::test]
async fn test_non_json_response_wrapped_with_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/plain"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("pong")
                .insert_header("Content-Type", "text/plain"),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let body = client.get("/plain", RequestOptions::new()).await.unwrap();

    assert_eq!(body["content"], "pong");
    assert_eq!(body["content_type"], "text/plain");
}

#[tokio::test]
async fn test_auth_headers_injected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/secure"))
        .and(header("X-API-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let body = client.get("/secure", RequestOptions::new()).await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_caller_headers_win_on_collision() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("X-API-Key", "override"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let body = client
        .get("/data", RequestOptions::new().header("X-API-Key", "override"))
        .await
        .unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/find"))
        .and(query_param("q", "Lon"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"list": []})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let body = client
        .get("/find", RequestOptions::new().query("q", "Lon").query("limit", "5"))
        .await
        .unwrap();
    assert_eq!(body["list"], serde_json::json!([]));
}

#[tokio::test]
async fn test_404_not_retried_and_body_preserved() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("city not found"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let err = client
        .get("/missing", RequestOptions::new())
        .await
        .unwrap_err();

    match err {
        Error::Api { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "city not found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_500_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boom"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(mock_server.uri())
        .max_retries(3)
        .initial_backoff(Duration::from_millis(10))
        .no_rate_limit();
    let client = test_client_with(config, &mock_server.uri());

    let err = client.get("/boom", RequestOptions::new()).await.unwrap_err();
    match err {
        Error::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_failures_retried_until_success() {
    let mock_server = MockServer::start().await;

    // First three attempts exceed the client timeout, fourth succeeds
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .up_to_n_times(3)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(mock_server.uri())
        .timeout(Duration::from_millis(200))
        .max_retries(3)
        .initial_backoff(Duration::from_millis(10))
        .no_rate_limit();
    let client = test_client_with(config, &mock_server.uri());

    let body = client.get("/slow", RequestOptions::new()).await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_connection_error_after_exhausting_retries() {
    // Nothing listens here
    let config = ClientConfig::new("http://127.0.0.1:1")
        .timeout(Duration::from_millis(200))
        .max_retries(1)
        .initial_backoff(Duration::from_millis(10))
        .no_rate_limit();
    let client = test_client_with(config, "http://127.0.0.1:1");

    let err = client.get("/anything", RequestOptions::new()).await.unwrap_err();
    match err {
        Error::Connection { attempts, .. } => assert_eq!(attempts, 2),
        other => panic!("expected Connection error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_backoff_delays_grow_exponentially() {
    // Connection refused fails in well under one backoff step, so the total
    // elapsed time is dominated by the inter-attempt delays: with a 10 ms
    // base and 3 retries the doubling sequence is 10 + 20 + 40 ms. A
    // constant-delay regression would finish in about 30 ms.
    let config = ClientConfig::new("http://127.0.0.1:1")
        .timeout(Duration::from_millis(200))
        .max_retries(3)
        .initial_backoff(Duration::from_millis(10))
        .no_rate_limit();
    let client = test_client_with(config, "http://127.0.0.1:1");

    let start = std::time::Instant::now();
    let err = client.get("/anything", RequestOptions::new()).await.unwrap_err();

    assert!(matches!(err, Error::Connection { attempts: 4, .. }));
    assert!(start.elapsed() >= Duration::from_millis(70));
}

#[tokio::test]
async fn test_health_check_first_candidate() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"up": true})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    assert!(client.health_check().await);
}

#[tokio::test]
async fn test_health_check_falls_through_404s() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    assert!(client.health_check().await);
}

#[tokio::test]
async fn test_health_check_all_404_still_true() {
    let mock_server = MockServer::start().await;

    // No mocks for the candidates: wiremock answers 404 for everything,
    // which the probe treats as "auth works, no health endpoint found"
    let client = test_client(&mock_server.uri());
    assert!(client.health_check().await);
}

#[tokio::test]
async fn test_health_check_non_404_error_is_false() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    assert!(!client.health_check().await);
}

#[tokio::test]
async fn test_close_is_idempotent_and_session_recreated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"n": 1})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());

    client.get("/data", RequestOptions::new()).await.unwrap();
    assert_eq!(client.api_info().await["client_info"]["session_active"], true);

    client.close().await;
    client.close().await;
    assert_eq!(client.api_info().await["client_info"]["session_active"], false);

    // Next request lazily recreates the session
    let body = client.get("/data", RequestOptions::new()).await.unwrap();
    assert_eq!(body["n"], 1);
}

#[tokio::test]
async fn test_api_info() {
    let config = ClientConfig::new("https://api.example.com/v1").rate_limit(RateLimitConfig {
        max_requests: 50,
        window: Duration::from_secs(60),
    });
    let client = test_client_with(config, "https://api.example.com");

    let info = client.api_info().await;
    assert_eq!(info["base_url"], "https://api.example.com/v1");
    assert_eq!(info["auth_type"], "api_key");
    assert_eq!(info["rate_limiting"]["enabled"], true);
    assert_eq!(info["rate_limiting"]["max_requests"], 50);
    assert_eq!(info["rate_limiting"]["window_secs"], 60);
    assert_eq!(info["client_info"]["session_active"], false);
}

#[tokio::test]
async fn test_full_url_passthrough() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/absolute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    // Client configured with an unrelated base URL; full URLs bypass joining
    let client = test_client_with(
        ClientConfig::new("https://other.example.com").no_rate_limit(),
        &mock_server.uri(),
    );
    let body = client
        .get(&format!("{}/absolute", mock_server.uri()), RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 7})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let body = client
        .post(
            "/items",
            RequestOptions::new().json(serde_json::json!({"name": "test"})),
        )
        .await
        .unwrap();
    assert_eq!(body["id"], 7);
}
