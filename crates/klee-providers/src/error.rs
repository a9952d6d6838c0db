//! Transport and provider-setup error types.

use thiserror::Error;

/// Failure of a single provider invocation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network failure, timeout, or client-side request error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// The body could not be parsed as a chat completion.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The API answered successfully but carried no text.
    #[error("provider returned no content")]
    EmptyResponse,

    /// Any other provider-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Failure to build a provider from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),

    #[error("provider '{provider}' has no API key (set providers.{provider}.apiKey or {env_key})")]
    NotConfigured {
        provider: String,
        env_key: &'static str,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
