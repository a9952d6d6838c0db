//! Configuration schema.
//!
//! Hierarchy: `Config` → `ModelConfig` (one per registered model),
//! `ProviderConfig` (one per vendor), `LoggingConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Model registered by default when no config file exists.
pub const DEFAULT_MODEL_NAME: &str = "siliconflow-deepseek-v3.2";

/// Default HTTP timeout for provider requests, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.klee/config.json` + env vars.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Name of the model used when a caller does not ask for one.
    /// Empty or absent means "first entry of `models`".
    #[serde(default)]
    pub default_model: String,
    /// Registered models, in enumeration order.
    pub models: Vec<ModelConfig>,
    /// Vendor credentials and endpoints, keyed by vendor name (e.g. `"siliconflow"`).
    pub providers: BTreeMap<String, ProviderConfig>,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        let mut providers = BTreeMap::new();
        providers.insert("siliconflow".to_string(), ProviderConfig::default());

        Self {
            default_model: DEFAULT_MODEL_NAME.to_string(),
            models: default_models(),
            providers,
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Name of the effective default model.
    pub fn effective_default_model(&self) -> Option<&str> {
        if self.default_model.is_empty() {
            self.models.first().map(|m| m.name.as_str())
        } else {
            Some(self.default_model.as_str())
        }
    }

    /// Provider config for a vendor, if one is present.
    pub fn provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.get(name)
    }
}

/// The SiliconFlow catalog shipped as the out-of-the-box registry.
fn default_models() -> Vec<ModelConfig> {
    [
        (DEFAULT_MODEL_NAME, "deepseek-ai/DeepSeek-V3.2"),
        ("siliconflow-qwen3-235b", "Qwen/Qwen3-235B-A22B-Instruct-2507"),
        ("siliconflow-kimi-k2", "moonshotai/Kimi-K2-Instruct-0905"),
        ("siliconflow-glm-4.6", "zai-org/GLM-4.6"),
    ]
    .into_iter()
    .map(|(name, model)| ModelConfig::new(name, "siliconflow", model))
    .collect()
}

// ─────────────────────────────────────────────
// Models
// ─────────────────────────────────────────────

/// One named, resolvable model.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelConfig {
    /// Registry name callers use (e.g. `"siliconflow-deepseek-v3.2"`).
    pub name: String,
    /// Vendor name from the provider catalog (e.g. `"siliconflow"`).
    pub provider: String,
    /// Model identifier on the remote side (e.g. `"deepseek-ai/DeepSeek-V3.2"`).
    pub model: String,
    /// Maximum tokens to generate per response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 – 2.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl ModelConfig {
    pub fn new(
        name: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            model: model.into(),
            max_tokens: None,
            temperature: None,
        }
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Configuration for a single LLM vendor (API key, base URL, headers).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Custom API base URL (overrides the vendor default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Extra HTTP headers to send with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: None,
            extra_headers: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ProviderConfig {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ─────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────

/// Log output settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of the compact human format.
    pub json: bool,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_default_model_registered() {
        let config = Config::default();
        assert_eq!(config.effective_default_model(), Some(DEFAULT_MODEL_NAME));
        assert!(config.models.iter().any(|m| m.name == DEFAULT_MODEL_NAME));
        assert!(config.provider("siliconflow").is_some());
    }

    #[test]
    fn test_default_model_names_unique() {
        let config = Config::default();
        let mut names: Vec<&str> = config.models.iter().map(|m| m.name.as_str()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_empty_default_falls_back_to_first_model() {
        let config = Config {
            default_model: String::new(),
            models: vec![
                ModelConfig::new("a", "openai", "gpt-4o-mini"),
                ModelConfig::new("b", "openai", "gpt-4o"),
            ],
            ..Default::default()
        };
        assert_eq!(config.effective_default_model(), Some("a"));
    }

    #[test]
    fn test_empty_default_and_no_models() {
        let config = Config {
            default_model: String::new(),
            models: Vec::new(),
            ..Default::default()
        };
        assert_eq!(config.effective_default_model(), None);
    }

    #[test]
    fn test_provider_config_camel_case() {
        let json = serde_json::to_value(ProviderConfig {
            api_key: "sk-1".to_string(),
            api_base: Some("https://example.com/v1".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(json["apiKey"], "sk-1");
        assert_eq!(json["apiBase"], "https://example.com/v1");
        assert_eq!(json["timeoutSecs"], DEFAULT_TIMEOUT_SECS);
        assert!(json.get("extraHeaders").is_none());
    }

    #[test]
    fn test_model_config_partial_json() {
        let model: ModelConfig = serde_json::from_str(
            r#"{"name": "fast", "provider": "groq", "model": "llama-3.3-70b", "maxTokens": 512}"#,
        )
        .unwrap();

        assert_eq!(model.name, "fast");
        assert_eq!(model.max_tokens, Some(512));
        assert!(model.temperature.is_none());
    }

    #[test]
    fn test_is_configured() {
        assert!(!ProviderConfig::default().is_configured());
        let cfg = ProviderConfig {
            api_key: "k".to_string(),
            ..Default::default()
        };
        assert!(cfg.is_configured());
    }
}
