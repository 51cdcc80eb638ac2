//! Error types for the Basecamp API client.

use thiserror::Error;

/// Result type alias using [`BasecampError`].
pub type BasecampResult<T> = Result<T, BasecampError>;

/// Errors that can occur when talking to the Basecamp API.
///
/// Every failed HTTP exchange is translated into exactly one of these
/// variants; the client never returns a partial success value.
#[derive(Debug, Error)]
pub enum BasecampError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// OAuth2 token exchange or refresh error.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Non-2xx response from the API. The body is kept verbatim so the
    /// host can surface the remote error message.
    #[error("Basecamp API error: HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BasecampError {
    /// HTTP status of the failed response, if this error carries one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the failure is transient and a later retry could succeed.
    ///
    /// Covers transport failures and server-side 5xx responses, plus the
    /// API's request-quota rejection (429). The client itself never
    /// retries; this classification is for the embedding host.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
