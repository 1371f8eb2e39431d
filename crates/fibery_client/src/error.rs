//! Client error types.

use fibery_core::SchemaError;

/// Failure at the network boundary
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Request could not be sent or its body read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status
    #[error("API returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// Token cannot be carried in an HTTP header
    #[error("API token contains characters not allowed in an HTTP header")]
    InvalidToken,

    /// API answered with an unexpected body
    #[error("Failed to decode API response: {0}")]
    Decode(String),
}

/// Client-level error
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// API answered with an empty response list
    #[error("API returned no response for the command")]
    EmptyResponse,

    /// API reported failure where a result was required
    #[error("API reported failure: {0}")]
    Backend(String),

    /// Schema catalogue could not be parsed
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
