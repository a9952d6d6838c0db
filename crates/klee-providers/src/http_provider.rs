//! Generic HTTP-based LLM provider for OpenAI-compatible APIs.
//!
//! Talks directly to any `/chat/completions` endpoint: SiliconFlow, OpenAI,
//! DeepSeek, DashScope, Moonshot, ZhiPu, Gemini, Groq, MiniMax, OpenRouter,
//! and self-hosted vLLM / Ollama.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, error, warn};

use klee_core::config::{ModelConfig, ProviderConfig};
use klee_core::types::{ChatCompletionRequest, ChatCompletionResponse, Message};

use crate::error::{SetupError, TransportError};
use crate::specs::{apply_model_overrides, find_by_name, resolve_api_key, ProviderSpec};
use crate::traits::{LlmProvider, LlmRequestConfig};

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// An LLM provider bound to one remote model on an OpenAI-compatible HTTP API.
pub struct HttpProvider {
    /// HTTP client (connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.siliconflow.cn/v1"`).
    api_base: String,
    /// API key for Bearer authentication. Empty for local vendors.
    api_key: String,
    /// Model identifier sent in every request.
    model: String,
    /// Sampling parameters, with per-model overrides already applied.
    request: LlmRequestConfig,
    /// Extra headers to send with each request.
    extra_headers: HeaderMap,
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("provider", &self.spec.display_name)
            .finish()
    }
}

impl HttpProvider {
    /// Create a new HttpProvider.
    ///
    /// # Arguments
    /// * `config`  — Vendor config (api_base, extra_headers, timeout)
    /// * `api_key` — Resolved API key (may be empty for local vendors)
    /// * `spec`    — Static vendor spec from the catalog
    /// * `model`   — Remote model identifier
    /// * `request` — Sampling parameters for this model
    pub fn new(
        config: &ProviderConfig,
        api_key: String,
        spec: &'static ProviderSpec,
        model: &str,
        request: LlmRequestConfig,
    ) -> Result<Self, SetupError> {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| spec.default_api_base.to_string());

        let mut extra_headers = HeaderMap::new();
        if let Some(ref headers) = config.extra_headers {
            for (key, value) in headers {
                if let (Ok(name), Ok(val)) = (
                    HeaderName::from_bytes(key.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    extra_headers.insert(name, val);
                } else {
                    warn!(header = %key, "Ignoring invalid extra header");
                }
            }
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let request = LlmRequestConfig {
            temperature: apply_model_overrides(model, spec, request.temperature),
            ..request
        };

        Ok(HttpProvider {
            client,
            api_base,
            api_key,
            model: model.to_string(),
            request,
            extra_headers,
            spec,
        })
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    async fn send(&self, messages: &[Message]) -> Result<String, TransportError> {
        debug!(
            provider = self.spec.display_name,
            model = %self.model,
            messages = messages.len(),
            "Calling LLM"
        );

        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: Some(self.request.max_tokens),
            temperature: Some(self.request.temperature),
        };

        let mut builder = self
            .client
            .post(self.completions_url())
            .headers(self.extra_headers.clone())
            .json(&request_body);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder.send().await.map_err(|e| {
            error!(provider = self.spec.display_name, error = %e, "HTTP request failed");
            TransportError::Request(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(
                provider = self.spec.display_name,
                status = %status,
                body = %body,
                "API error"
            );
            return Err(TransportError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                provider = self.spec.display_name,
                error = %e,
                "Failed to parse LLM response"
            );
            TransportError::Decode(e.to_string())
        })?;

        let finish_reason = parsed
            .choices
            .first()
            .and_then(|c| c.finish_reason.clone());
        let text = parsed.into_text().ok_or(TransportError::EmptyResponse)?;

        debug!(
            provider = self.spec.display_name,
            chars = text.len(),
            finish_reason = finish_reason.as_deref().unwrap_or("?"),
            "LLM response received"
        );
        Ok(text)
    }

    fn remote_model(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

// ─────────────────────────────────────────────
// Builder (convenience)
// ─────────────────────────────────────────────

/// Build an HttpProvider for one model entry from the vendor configs.
///
/// The vendor must exist in the catalog and, unless it is local, have an API
/// key either in its config section or in its conventional env var.
pub fn create_provider(
    model: &ModelConfig,
    providers: &BTreeMap<String, ProviderConfig>,
) -> Result<HttpProvider, SetupError> {
    let spec = find_by_name(&model.provider)
        .ok_or_else(|| SetupError::UnknownProvider(model.provider.clone()))?;

    let fallback = ProviderConfig::default();
    let config = providers.get(spec.name);
    let api_key = match resolve_api_key(config, spec) {
        Some(key) => key,
        None if spec.is_local => String::new(),
        None => {
            return Err(SetupError::NotConfigured {
                provider: spec.name.to_string(),
                env_key: spec.env_key,
            })
        }
    };

    debug!(
        provider = spec.display_name,
        model = %model.model,
        api_base = config
            .and_then(|c| c.api_base.as_deref())
            .unwrap_or(spec.default_api_base),
        "Creating LLM provider"
    );

    HttpProvider::new(
        config.unwrap_or(&fallback),
        api_key,
        spec,
        &model.model,
        LlmRequestConfig::from_model(model),
    )
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
