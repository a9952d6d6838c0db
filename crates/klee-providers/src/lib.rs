//! LLM provider layer for Klee.
//!
//! # Architecture
//!
//! - [`traits::LlmProvider`] — the `send(messages) -> text` capability every transport implements
//! - [`specs`] — static catalog of supported vendors (endpoints, key env vars, quirks)
//! - [`http_provider::HttpProvider`] — OpenAI-compatible HTTP client
//! - [`http_provider::create_provider`] — builder from a model entry + vendor configs

pub mod error;
pub mod http_provider;
pub mod specs;
pub mod traits;

pub use error::{SetupError, TransportError};
pub use http_provider::{create_provider, HttpProvider};
pub use specs::{ProviderSpec, PROVIDERS};
pub use traits::{LlmProvider, LlmRequestConfig};
