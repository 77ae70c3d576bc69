//! Error types for the Verso HTTP clients

use crate::config::ConfigError;
use thiserror::Error;

/// Errors from talking to the Verso or Consul endpoints.
///
/// The three failure classes stay distinct on purpose: a transport
/// failure is retryable by the caller, an API error carries the
/// backend's verdict, and a schema error means the payload does not
/// match the contract and must never be coerced into data.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response from {endpoint} does not match the contract: {source}")]
    Schema {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

// =============================================================================
// TESTS
// =============================================================================
