//! Client configuration.

use crate::error::ClientError;
use secrecy::SecretString;
use std::time::Duration;

/// Workspace host, e.g. `acme.fibery.io`
pub const HOST_ENV: &str = "FIBERY_HOST";
/// API token
pub const TOKEN_ENV: &str = "FIBERY_API_TOKEN";
/// Request timeout in seconds
pub const TIMEOUT_ENV: &str = "FIBERY_TIMEOUT_SECS";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for one workspace
#[derive(Debug)]
pub struct ClientConfig {
    /// Workspace host, with or without scheme
    pub host: String,
    /// API token; never printed
    pub token: SecretString,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration
    ///
    /// # Errors
    ///
    /// Returns error if host or token is empty
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Result<Self, ClientError> {
        let host = host.into().trim().to_string();
        let token = token.into();
        if host.is_empty() {
            return Err(ClientError::Config(format!("{HOST_ENV} is not set")));
        }
        if token.trim().is_empty() {
            return Err(ClientError::Config(format!("{TOKEN_ENV} is not set")));
        }

        Ok(Self {
            host,
            token: SecretString::from(token),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `FIBERY_HOST`, `FIBERY_API_TOKEN` and `FIBERY_TIMEOUT_SECS`
    ///
    /// # Errors
    ///
    /// Returns error if a required variable is missing or the timeout is not a number
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let host = lookup(HOST_ENV).unwrap_or_default();
        let token = lookup(TOKEN_ENV).unwrap_or_default();
        let config = Self::new(host, token)?;

        match lookup(TIMEOUT_ENV) {
            None => Ok(config),
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ClientError::Config(format!("{TIMEOUT_ENV} must be a whole number of seconds, got {raw:?}"))
                })?;
                Ok(config.with_timeout(Duration::from_secs(secs)))
            }
        }
    }

    /// Base URL, `https://` unless the host carries a scheme
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }

    /// Command endpoint URL
    #[must_use]
    pub fn commands_url(&self) -> String {
        format!("{}/api/commands", self.base_url())
    }
}
