//! Client configuration.

use std::time::Duration;

use crate::error::{BasecampError, BasecampResult};

/// Default Basecamp API origin. Account ids are appended per request.
pub const DEFAULT_API_ORIGIN: &str = "https://3.basecampapi.com";

/// Default launchpad origin used for the account listing endpoint.
pub const DEFAULT_LAUNCHPAD_ORIGIN: &str = "https://launchpad.37signals.com";

/// Client identification sent with every request. Basecamp rejects
/// requests without a User-Agent naming the integration.
pub const DEFAULT_USER_AGENT: &str = "basecamp-connector (rust)";

/// Configuration for [`crate::BasecampClient`].
///
/// The origins are overridable so tests can point the client at a local
/// mock server; production callers keep the defaults.
#[derive(Debug, Clone)]
pub struct BasecampConfig {
    /// API origin, without trailing slash.
    pub api_origin: String,
    /// Launchpad origin (OAuth provider host), without trailing slash.
    pub launchpad_origin: String,
    /// User-Agent header value sent with every request.
    pub user_agent: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for BasecampConfig {
    fn default() -> Self {
        Self {
            api_origin: DEFAULT_API_ORIGIN.to_string(),
            launchpad_origin: DEFAULT_LAUNCHPAD_ORIGIN.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl BasecampConfig {
    /// Override the API origin (trailing slashes are stripped).
    #[must_use]
    pub fn with_api_origin(mut self, origin: impl Into<String>) -> Self {
        self.api_origin = origin.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the launchpad origin (trailing slashes are stripped).
    #[must_use]
    pub fn with_launchpad_origin(mut self, origin: impl Into<String>) -> Self {
        self.launchpad_origin = origin.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the User-Agent header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> BasecampResult<()> {
        if self.api_origin.is_empty() {
            return Err(BasecampError::Config("api_origin must not be empty".into()));
        }
        if self.launchpad_origin.is_empty() {
            return Err(BasecampError::Config(
                "launchpad_origin must not be empty".into(),
            ));
        }
        if self.user_agent.is_empty() {
            return Err(BasecampError::Config("user_agent must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = BasecampConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_origin, DEFAULT_API_ORIGIN);
    }

    #[test]
    fn origin_overrides_strip_trailing_slash() {
        let config = BasecampConfig::default()
            .with_api_origin("http://127.0.0.1:9000/")
            .with_launchpad_origin("http://127.0.0.1:9001/");
        assert_eq!(config.api_origin, "http://127.0.0.1:9000");
        assert_eq!(config.launchpad_origin, "http://127.0.0.1:9001");
    }

    #[test]
    fn empty_origin_is_rejected() {
        let config = BasecampConfig::default().with_api_origin("");
        assert!(matches!(
            config.validate(),
            Err(BasecampError::Config(_))
        ));
    }
}
