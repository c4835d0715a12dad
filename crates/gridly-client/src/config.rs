//! Client configuration resolved once at process start.
//!
//! The API key is read from `GRIDLY_API_KEY`. The base address defaults to the
//! public Gridly endpoint and can be overridden for staging or tests.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{ClientError, ClientResult};

/// Environment variable holding the Gridly API key.
pub const API_KEY_ENV: &str = "GRIDLY_API_KEY";

/// Public Gridly REST API address.
pub const DEFAULT_BASE_URL: &str = "https://api.gridly.com/v1";

/// Immutable connection settings for the Gridly API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    api_key: SecretString,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: SecretString::from(api_key.into()),
        }
    }

    /// Resolve from the process environment.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve using an arbitrary variable lookup.
    ///
    /// A missing or blank API key is a configuration error.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ClientError::config_error(format!(
                    "{API_KEY_ENV} environment variable is required"
                ))
            })?;

        Ok(Self::new(DEFAULT_BASE_URL, api_key))
    }

    /// Replace the base address, keeping the credential.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Value of the `Authorization` header.
    pub(crate) fn authorization(&self) -> String {
        format!("ApiKey {}", self.api_key.expose_secret())
    }
}
