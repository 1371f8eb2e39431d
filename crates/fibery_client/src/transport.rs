//! Network boundary.

use crate::config::ClientConfig;
use crate::error::TransportError;
use async_trait::async_trait;
use fibery_core::{Command, CommandResponse};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::debug;

/// Sends command lists to the API
///
/// One call is one outbound request. Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send commands and return one response per command
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be decoded
    async fn send(&self, commands: &[Command]) -> Result<Vec<CommandResponse>, TransportError>;
}

/// HTTP transport posting to `/api/commands`
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    /// Build a transport from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client cannot be created
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut auth = HeaderValue::from_str(&format!("Token {}", config.token.expose_secret()))
            .map_err(|_| TransportError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url: config.commands_url(),
        })
    }

    /// Endpoint this transport posts to
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, commands: &[Command]) -> Result<Vec<CommandResponse>, TransportError> {
        debug!(url = %self.url, commands = commands.len(), "posting commands");

        let response = self
            .client
            .post(&self.url)
            .json(commands)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_url() {
        let config = ClientConfig::new("acme.fibery.io", "t").unwrap();
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.url(), "https://acme.fibery.io/api/commands");
    }

    #[test]
    fn test_http_transport_rejects_unprintable_token() {
        let config = ClientConfig::new("acme.fibery.io", "bad\ntoken").unwrap();
        assert!(matches!(
            HttpTransport::new(&config),
            Err(TransportError::InvalidToken)
        ));
    }
}
