//! Mock Basecamp API using wiremock for integration testing.
//!
//! Simulates the account-scoped project endpoint (with a configurable
//! dock), bucket-scoped listings, and the launchpad authorization
//! endpoint.

#![allow(dead_code)]

use std::sync::Arc;

use basecamp_client::{BasecampClient, BasecampConfig, StaticToken};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock Basecamp instance plus a client wired to it.
pub struct MockBasecamp {
    server: MockServer,
}

impl MockBasecamp {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// A client with a static bearer token, both origins pointed here.
    pub fn client(&self) -> BasecampClient {
        let config = BasecampConfig::default()
            .with_api_origin(self.uri())
            .with_launchpad_origin(self.uri());
        BasecampClient::with_http_client(
            config,
            Arc::new(StaticToken::new("test-token")),
            reqwest::Client::new(),
        )
    }

    /// Mount `GET /{account}/buckets/{project}/project.json` with the
    /// given dock entries.
    pub async fn mount_project(&self, account: &str, project: &str, dock: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path(format!("/{account}/buckets/{project}/project.json")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": project.parse::<u64>().unwrap_or(0),
                "name": "Test project",
                "dock": dock,
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount the launchpad authorization endpoint with the given
    /// account objects.
    pub async fn mount_authorization(&self, accounts: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/authorization.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "identity": {"id": 1, "email_address": "user@example.com"},
                "accounts": accounts,
            })))
            .mount(&self.server)
            .await;
    }
}

/// A dock entry as the project endpoint serves it.
pub fn dock_entry(name: &str, id: i64, title: &str, url: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "title": title,
        "url": url,
        "enabled": true,
    })
}

/// `n` listed items with sequential ids starting at `start`.
pub fn items(start: u64, n: usize) -> Vec<Value> {
    (0..n as u64)
        .map(|i| json!({"id": start + i, "title": format!("Item {}", start + i)}))
        .collect()
}
