//! Host-context seam.
//!
//! The embedding host owns parameter storage (the values a user picked
//! in dependent dropdowns). The connector reads them through
//! [`ParameterSource`] instead of any host-specific execution object,
//! so every function takes an explicit context value.

use std::collections::HashMap;

use crate::error::{ConnectorError, ConnectorResult};

/// Read access to the host's current parameter values.
pub trait ParameterSource: Send + Sync {
    /// The current value of a named parameter, if the user has set one.
    fn parameter(&self, name: &str) -> Option<String>;

    /// Like [`Self::parameter`], but a missing value is a precise error.
    fn required(&self, name: &str) -> ConnectorResult<String> {
        self.parameter(name)
            .ok_or_else(|| ConnectorError::MissingParameter(name.to_string()))
    }
}

/// Map-backed parameter source for tests and library embedders.
#[derive(Debug, Clone, Default)]
pub struct StaticParameters(HashMap<String, String>);

impl StaticParameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl ParameterSource for StaticParameters {
    fn parameter(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}
