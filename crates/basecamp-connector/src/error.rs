//! Error types for the connector layer.

use thiserror::Error;

use crate::operation::{Action, Resource};

/// Result type alias using [`ConnectorError`].
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Errors raised by dock resolution, option builders, and dispatch.
///
/// Resolution misses (absent dock entries, non-matching dock URLs) are
/// deliberately *not* errors — they propagate as empty results so the
/// host can show an empty selectable set.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Failure from the underlying API client.
    #[error(transparent)]
    Api(#[from] basecamp_client::BasecampError),

    /// A response fragment did not deserialize into its model.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The host context did not supply a required parameter.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// The (resource, action) pair is outside the closed dispatch table.
    #[error("{resource} does not support {action}")]
    Unsupported { resource: Resource, action: Action },
}
