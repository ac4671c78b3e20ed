//! Client configuration.
//!
//! # Design
//! Both keys are optional at construction time and only checked when a URL
//! is rendered, so a `Config` can be deserialized from partial input without
//! failing. Loading from files or the environment is left to the host; this
//! module only accepts values or JSON text.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigKey, ImaginaryError, Result};

/// Endpoint and tenant for an Imaginary service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Service base endpoint, e.g. `https://imaginary.com`.
    #[serde(default)]
    pub url: Option<String>,
    /// Tenant namespace segment.
    #[serde(default)]
    pub client: Option<String>,
}

impl Config {
    pub fn new(url: impl Into<String>, client: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            client: Some(client.into()),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| ImaginaryError::Deserialization(e.to_string()))
    }

    /// The base URL with any trailing slash removed.
    pub(crate) fn require_url(&self) -> Result<&str> {
        self.url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .ok_or(ImaginaryError::MissingConfiguration(ConfigKey::Url))
    }

    pub(crate) fn require_client(&self) -> Result<&str> {
        self.client
            .as_deref()
            .ok_or(ImaginaryError::MissingConfiguration(ConfigKey::Client))
    }
}
