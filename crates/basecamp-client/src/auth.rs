//! Credential provisioning — static bearer tokens and host-managed
//! OAuth2 refresh.
//!
//! Token issuance belongs to the embedding host; the client only asks a
//! [`CredentialProvider`] for a currently valid access token before each
//! request. [`RefreshingToken`] covers hosts that hand us a refresh
//! token and expect the connector to keep the access token fresh.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{BasecampError, BasecampResult};

/// Supplies a valid bearer token for outgoing requests.
#[async_trait]
pub trait CredentialProvider: Send + Sync + std::fmt::Debug {
    /// Return an access token valid for the next request.
    async fn access_token(&self) -> BasecampResult<String>;

    /// Drop any cached token (called by the client on a 401 response).
    async fn invalidate(&self) {}
}

/// A fixed bearer token, used when the host injects ready credentials.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticToken").field(&"[REDACTED]").finish()
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn access_token(&self) -> BasecampResult<String> {
        Ok(self.0.clone())
    }
}

/// OAuth2 token response from the launchpad token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Cached access token with expiry.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(exp) => Instant::now() >= exp,
            None => false,
        }
    }
}

/// Refresh-token credentials for the 37signals launchpad.
///
/// The token exchange carries `client_id` and `client_secret` in the
/// form body rather than as Basic auth — the launchpad rejects the
/// Authorization-header variant, so this deviation is load-bearing.
pub struct RefreshingToken {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    token_endpoint: String,
    http_client: reqwest::Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl std::fmt::Debug for RefreshingToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshingToken")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_endpoint", &self.token_endpoint)
            .finish()
    }
}

impl RefreshingToken {
    /// Create a refreshing provider. `token_endpoint` is the absolute
    /// URL of the launchpad token-exchange endpoint.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
        token_endpoint: impl Into<String>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            token_endpoint: token_endpoint.into(),
            http_client,
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    async fn refresh(&self) -> BasecampResult<CachedToken> {
        debug!("Refreshing access token via {}", self.token_endpoint);

        // Launchpad-specific: credentials travel in the body, and the
        // grant is labelled `type=refresh` alongside the standard field.
        let form = [
            ("type", "refresh"),
            ("grant_type", "refresh_token"),
            ("refresh_token", self.refresh_token.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.token_endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| BasecampError::Auth(format!("Token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(BasecampError::Auth(format!(
                "Token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| BasecampError::Auth(format!("Failed to parse token response: {e}")))?;

        // Expire 30 seconds early so an in-flight request never carries
        // a token the provider is about to reject.
        let expires_at = token
            .expires_in
            .map(|secs| Instant::now() + Duration::from_secs(secs.saturating_sub(30)));

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}

#[async_trait]
impl CredentialProvider for RefreshingToken {
    async fn access_token(&self) -> BasecampResult<String> {
        {
            let cache = self.cached_token.read().await;
            if let Some(cached) = cache.as_ref() {
                if !cached.is_expired() {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        let fresh = self.refresh().await?;
        let token = fresh.access_token.clone();
        let mut cache = self.cached_token.write().await;
        *cache = Some(fresh);
        Ok(token)
    }

    async fn invalidate(&self) {
        let mut cache = self.cached_token.write().await;
        *cache = None;
    }
}
