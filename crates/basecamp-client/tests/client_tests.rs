//! Integration tests for the authenticated request client — URL
//! composition, header handling, body/query omission, error
//! translation, and token refresh.

use std::sync::Arc;

use basecamp_client::{
    BasecampClient, BasecampConfig, BasecampError, RefreshingToken, StaticToken,
};
use reqwest::Method;
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_string, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper: client with a static bearer token pointed at a mock server.
fn test_client(server: &MockServer) -> BasecampClient {
    let config = BasecampConfig::default()
        .with_api_origin(server.uri())
        .with_launchpad_origin(server.uri());
    BasecampClient::with_http_client(
        config,
        Arc::new(StaticToken::new("test-token-123")),
        reqwest::Client::new(),
    )
}

#[tokio::test]
async fn account_id_appears_verbatim_in_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/9999/projects/123.json"))
        .and(header("Authorization", "Bearer test-token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 123})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let value = client
        .request(Method::GET, "/projects/123.json", &Map::new(), &[], "9999")
        .await
        .unwrap();

    assert_eq!(value["id"], 123);
}

#[tokio::test]
async fn sends_json_content_type_and_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1/people.json"))
        .and(header("Content-Type", "application/json"))
        .and(header("User-Agent", "basecamp-connector (rust)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client
        .request(Method::GET, "/people.json", &Map::new(), &[], "1")
        .await
        .unwrap();
}

#[tokio::test]
async fn empty_body_is_omitted_entirely() {
    let server = MockServer::start().await;

    // An empty map must never be serialized as `{}` — the raw request
    // body has to be completely absent.
    Mock::given(method("POST"))
        .and(path("/1/buckets/5/todos/9/completion.json"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let value = client
        .request(
            Method::POST,
            "/buckets/5/todos/9/completion.json",
            &Map::new(),
            &[],
            "1",
        )
        .await
        .unwrap();

    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn non_empty_body_is_sent_as_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1/projects.json"))
        .and(body_string_contains("\"name\":\"Launch\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut body = Map::new();
    body.insert("name".to_string(), json!("Launch"));
    let value = client
        .request(Method::POST, "/projects.json", &body, &[], "1")
        .await
        .unwrap();

    assert_eq!(value["id"], 7);
}

#[tokio::test]
async fn query_parameters_are_attached_when_present() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1/projects.json"))
        .and(query_param("status", "archived"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client
        .request(
            Method::GET,
            "/projects.json",
            &Map::new(),
            &[("status".to_string(), "archived".to_string())],
            "1",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn non_2xx_translates_to_http_error_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1/projects/404.json"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .request(Method::GET, "/projects/404.json", &Map::new(), &[], "1")
        .await
        .unwrap_err();

    match err {
        BasecampError::Http { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "Not found");
        }
        other => panic!("Expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_classify_as_transient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1/projects.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .request(Method::GET, "/projects.json", &Map::new(), &[], "1")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(err.is_transient());
}

#[tokio::test]
async fn rate_limit_response_surfaces_as_429() {
    let server = MockServer::start().await;

    // The client performs no backoff of its own; the quota rejection
    // surfaces directly.
    Mock::given(method("GET"))
        .and(path("/1/projects.json"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too many requests"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .request(Method::GET, "/projects.json", &Map::new(), &[], "1")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(429));
    assert!(err.is_transient());
}

#[tokio::test]
async fn refresh_sends_credentials_in_form_body() {
    let server = MockServer::start().await;

    // Launchpad requires client id/secret in the token-exchange body,
    // never as Basic auth.
    Mock::given(method("POST"))
        .and(path("/authorization/token"))
        .and(body_string_contains("client_id=the-client"))
        .and(body_string_contains("client_secret=the-secret"))
        .and(body_string_contains("refresh_token=the-refresh"))
        .and(body_string_contains("type=refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-token",
            "expires_in": 1209600
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/9999/projects.json"))
        .and(header("Authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let provider = RefreshingToken::new(
        "the-client",
        "the-secret",
        "the-refresh",
        format!("{}/authorization/token", server.uri()),
        reqwest::Client::new(),
    );
    let config = BasecampConfig::default().with_api_origin(server.uri());
    let client =
        BasecampClient::with_http_client(config, Arc::new(provider), reqwest::Client::new());

    // Two requests, one token exchange: the second call hits the cache.
    for _ in 0..2 {
        client
            .request(Method::GET, "/projects.json", &Map::new(), &[], "9999")
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn unauthorized_invalidates_cached_token() {
    let server = MockServer::start().await;

    // First exchange hands out a token the API rejects; the 401 must
    // flush the cache so the next call performs a fresh exchange.
    Mock::given(method("POST"))
        .and(path("/authorization/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "revoked-token",
            "expires_in": 1209600
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/authorization/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "valid-token",
            "expires_in": 1209600
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1/people.json"))
        .and(header("Authorization", "Bearer revoked-token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1/people.json"))
        .and(header("Authorization", "Bearer valid-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let provider = RefreshingToken::new(
        "id",
        "secret",
        "refresh",
        format!("{}/authorization/token", server.uri()),
        reqwest::Client::new(),
    );
    let config = BasecampConfig::default().with_api_origin(server.uri());
    let client =
        BasecampClient::with_http_client(config, Arc::new(provider), reqwest::Client::new());

    let err = client
        .request(Method::GET, "/people.json", &Map::new(), &[], "1")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));

    client
        .request(Method::GET, "/people.json", &Map::new(), &[], "1")
        .await
        .unwrap();
}
