//! Authenticated HTTP client for the Basecamp API (reqwest-based).

use std::sync::Arc;

use reqwest::header::{HeaderMap, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::auth::CredentialProvider;
use crate::config::BasecampConfig;
use crate::error::{BasecampError, BasecampResult};

/// Authenticated request client for the Basecamp API.
///
/// Every request is scoped to an account id supplied by the caller:
/// `{api_origin}/{account}{path}`. The account id is inserted verbatim,
/// with no normalization beyond concatenation.
#[derive(Debug, Clone)]
pub struct BasecampClient {
    config: BasecampConfig,
    http_client: Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl BasecampClient {
    /// Create a new client.
    pub fn new(
        config: BasecampConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> BasecampResult<Self> {
        config.validate()?;
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BasecampError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            http_client,
            credentials,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(
        config: BasecampConfig,
        credentials: Arc<dyn CredentialProvider>,
        http_client: Client,
    ) -> Self {
        Self {
            config,
            http_client,
            credentials,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &BasecampConfig {
        &self.config
    }

    /// Issue a request against an account-scoped path and return the
    /// parsed JSON body.
    ///
    /// An empty `body` map is entirely omitted from the request — it is
    /// never serialized as `{}`, since the API treats an explicit empty
    /// body differently from an absent one on some verbs. Likewise an
    /// empty `query` slice produces no query string at all.
    #[instrument(skip(self, body, query))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: &Map<String, Value>,
        query: &[(String, String)],
        account: &str,
    ) -> BasecampResult<Value> {
        let (value, _) = self
            .request_with_headers(method, path, body, query, account)
            .await?;
        Ok(value)
    }

    /// Like [`Self::request`], but also returns the response headers.
    /// The pagination walk needs them for the `Link` header.
    pub async fn request_with_headers(
        &self,
        method: Method,
        path: &str,
        body: &Map<String, Value>,
        query: &[(String, String)],
        account: &str,
    ) -> BasecampResult<(Value, HeaderMap)> {
        let url = format!("{}/{}{}", self.config.api_origin, account, path);
        debug!("Basecamp {} {}", method, url);

        let mut builder = self.http_client.request(method, &url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if !body.is_empty() {
            builder = builder.json(body);
        }
        self.send(builder).await
    }

    /// Issue a request against an already-absolute URL, bypassing
    /// origin/account composition.
    ///
    /// Used for `Link`-header continuation targets (which arrive
    /// complete, query string included) and for launchpad endpoints
    /// that live outside the API host.
    #[instrument(skip(self))]
    pub async fn request_url(
        &self,
        method: Method,
        url: &str,
    ) -> BasecampResult<(Value, HeaderMap)> {
        debug!("Basecamp {} {}", method, url);
        let builder = self.http_client.request(method, url);
        self.send(builder).await
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> BasecampResult<(Value, HeaderMap)> {
        let token = self.credentials.access_token().await?;
        let response = builder
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, &self.config.user_agent)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();

        if status.is_success() {
            let text = response.text().await?;
            let value = if text.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text)?
            };
            return Ok((value, headers));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // The cached token may have been revoked; drop it so the
            // next call refreshes before failing twice.
            self.credentials.invalidate().await;
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        Err(BasecampError::Http {
            status: status.as_u16(),
            body,
        })
    }
}
