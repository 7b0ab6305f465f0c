//! Read-once client configuration.
//!
//! The base URL is used verbatim: endpoint paths are appended by plain
//! concatenation, so it must already end with `/`.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable that overrides `ApiBaseUrl` from the settings file.
pub const BASE_URL_ENV: &str = "API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    #[serde(rename = "ApiBaseUrl", default)]
    pub api_base_url: String,
}

impl ApiConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
        }
    }

    /// Parse an `appsettings.json`-style document. Keys other than
    /// `ApiBaseUrl` are ignored.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: ApiConfig = serde_json::from_str(raw)?;
        config.validated()
    }

    /// Read the settings file at `path`; `API_BASE_URL` wins over the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: ApiConfig = serde_json::from_str(&raw)?;
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            config.api_base_url = url;
        }
        config.validated()
    }

    pub fn base_url(&self) -> &str {
        &self.api_base_url
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.api_base_url.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        Ok(self)
    }
}
