//! LLM Provider trait — the transport capability the dispatch layer depends on.
//!
//! Every backend (SiliconFlow, OpenAI, DeepSeek, …) implements this trait.
//! The `HttpProvider` in `http_provider.rs` covers all OpenAI-compatible APIs;
//! tests substitute in-process implementations.

use async_trait::async_trait;
use klee_core::config::ModelConfig;
use klee_core::types::Message;

use crate::error::TransportError;

/// Sampling parameters bound to one provider instance.
#[derive(Clone, Debug, PartialEq)]
pub struct LlmRequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

impl LlmRequestConfig {
    /// Defaults overridden by whatever the model entry sets.
    pub fn from_model(model: &ModelConfig) -> Self {
        let defaults = Self::default();
        Self {
            max_tokens: model.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: model.temperature.unwrap_or(defaults.temperature),
        }
    }
}

/// Trait that all LLM providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat exchange and return the assistant's reply text.
    ///
    /// `messages` are forwarded unmodified, in order. An `Ok` value is never
    /// empty: a reply without text is a `TransportError::EmptyResponse`.
    async fn send(&self, messages: &[Message]) -> Result<String, TransportError>;

    /// Model identifier on the remote side.
    fn remote_model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
