//! Provider catalog — static specs for every supported OpenAI-compatible vendor.
//!
//! Each `ProviderSpec` describes how to reach one vendor: default endpoint,
//! the conventional API key environment variable, and per-model quirks.
//! Lookup is by exact vendor name only.

use klee_core::config::ProviderConfig;

// ─────────────────────────────────────────────
// ProviderSpec — static metadata for one vendor
// ─────────────────────────────────────────────

/// Static specification describing one LLM vendor.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Internal name used in config files (e.g. `"siliconflow"`).
    pub name: &'static str,
    /// Conventional environment variable for the API key.
    pub env_key: &'static str,
    /// Human-readable name for logs. E.g. `"SiliconFlow"`.
    pub display_name: &'static str,
    /// API base URL used when the config does not set one.
    pub default_api_base: &'static str,
    /// Self-hosted vendors run without an API key.
    pub is_local: bool,
    /// Per-model overrides, matched against the lowercase remote model name.
    pub model_overrides: &'static [ModelOverride],
}

/// A per-model parameter override.
#[derive(Clone, Debug)]
pub struct ModelOverride {
    /// Substring to match in the lowercase model name.
    pub pattern: &'static str,
    /// The field to override.
    pub field: OverrideField,
    /// The value to set.
    pub value: f64,
}

/// Fields that can be overridden per model.
#[derive(Clone, Debug)]
pub enum OverrideField {
    Temperature,
}

// Kimi K2.5 rejects temperatures below 1.0.
const KIMI_K25_OVERRIDES: &[ModelOverride] = &[ModelOverride {
    pattern: "kimi-k2.5",
    field: OverrideField::Temperature,
    value: 1.0,
}];

// ─────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────

/// Complete list of supported vendors.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        name: "siliconflow",
        env_key: "SILICONFLOW_API_KEY",
        display_name: "SiliconFlow",
        default_api_base: "https://api.siliconflow.cn/v1",
        is_local: false,
        model_overrides: KIMI_K25_OVERRIDES,
    },
    ProviderSpec {
        name: "openai",
        env_key: "OPENAI_API_KEY",
        display_name: "OpenAI",
        default_api_base: "https://api.openai.com/v1",
        is_local: false,
        model_overrides: &[],
    },
    ProviderSpec {
        name: "openrouter",
        env_key: "OPENROUTER_API_KEY",
        display_name: "OpenRouter",
        default_api_base: "https://openrouter.ai/api/v1",
        is_local: false,
        model_overrides: KIMI_K25_OVERRIDES,
    },
    ProviderSpec {
        name: "deepseek",
        env_key: "DEEPSEEK_API_KEY",
        display_name: "DeepSeek",
        default_api_base: "https://api.deepseek.com/v1",
        is_local: false,
        model_overrides: &[],
    },
    ProviderSpec {
        name: "dashscope",
        env_key: "DASHSCOPE_API_KEY",
        display_name: "DashScope",
        default_api_base: "https://dashscope.aliyuncs.com/compatible-mode/v1",
        is_local: false,
        model_overrides: &[],
    },
    ProviderSpec {
        name: "moonshot",
        env_key: "MOONSHOT_API_KEY",
        display_name: "Moonshot",
        default_api_base: "https://api.moonshot.ai/v1",
        is_local: false,
        model_overrides: KIMI_K25_OVERRIDES,
    },
    ProviderSpec {
        name: "zhipu",
        env_key: "ZAI_API_KEY",
        display_name: "ZhiPu",
        default_api_base: "https://open.bigmodel.cn/api/paas/v4",
        is_local: false,
        model_overrides: &[],
    },
    ProviderSpec {
        name: "gemini",
        env_key: "GEMINI_API_KEY",
        display_name: "Gemini",
        default_api_base: "https://generativelanguage.googleapis.com/v1beta/openai",
        is_local: false,
        model_overrides: &[],
    },
    ProviderSpec {
        name: "groq",
        env_key: "GROQ_API_KEY",
        display_name: "Groq",
        default_api_base: "https://api.groq.com/openai/v1",
        is_local: false,
        model_overrides: &[],
    },
    ProviderSpec {
        name: "minimax",
        env_key: "MINIMAX_API_KEY",
        display_name: "MiniMax",
        default_api_base: "https://api.minimax.io/v1",
        is_local: false,
        model_overrides: &[],
    },
    ProviderSpec {
        name: "vllm",
        env_key: "HOSTED_VLLM_API_KEY",
        display_name: "vLLM",
        default_api_base: "http://localhost:8000/v1",
        is_local: true,
        model_overrides: &[],
    },
    ProviderSpec {
        name: "ollama",
        env_key: "OLLAMA_API_KEY",
        display_name: "Ollama",
        default_api_base: "http://localhost:11434/v1",
        is_local: true,
        model_overrides: &[],
    },
];

// ─────────────────────────────────────────────
// Lookup helpers
// ─────────────────────────────────────────────

/// Find a provider spec by exact name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

/// Apply per-model overrides to the sampling temperature.
pub fn apply_model_overrides(model: &str, spec: &ProviderSpec, temperature: f64) -> f64 {
    let model_lower = model.to_lowercase();
    let mut temp = temperature;

    for ovr in spec.model_overrides {
        if model_lower.contains(ovr.pattern) {
            match ovr.field {
                OverrideField::Temperature => temp = ovr.value,
            }
        }
    }

    temp
}

/// The API key to use: the configured one, else the vendor's env var.
pub fn resolve_api_key(config: Option<&ProviderConfig>, spec: &ProviderSpec) -> Option<String> {
    config
        .filter(|c| c.is_configured())
        .map(|c| c.api_key.clone())
        .or_else(|| std::env::var(spec.env_key).ok().filter(|k| !k.is_empty()))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_name() {
        let spec = find_by_name("siliconflow").unwrap();
        assert_eq!(spec.display_name, "SiliconFlow");
        assert_eq!(spec.env_key, "SILICONFLOW_API_KEY");
    }

    #[test]
    fn test_find_by_name_is_exact() {
        assert!(find_by_name("SiliconFlow").is_none());
        assert!(find_by_name("silicon").is_none());
        assert!(find_by_name(" openai").is_none());
    }

    #[test]
    fn test_local_providers() {
        assert!(find_by_name("vllm").unwrap().is_local);
        assert!(find_by_name("ollama").unwrap().is_local);
        assert!(!find_by_name("openai").unwrap().is_local);
    }

    #[test]
    fn test_model_override_kimi_k25() {
        let spec = find_by_name("moonshot").unwrap();
        assert_eq!(apply_model_overrides("kimi-k2.5-preview", spec, 0.7), 1.0);
    }

    #[test]
    fn test_model_override_case_insensitive() {
        let spec = find_by_name("siliconflow").unwrap();
        assert_eq!(apply_model_overrides("moonshotai/Kimi-K2.5", spec, 0.3), 1.0);
    }

    #[test]
    fn test_model_override_no_match() {
        let spec = find_by_name("moonshot").unwrap();
        assert_eq!(apply_model_overrides("moonshot-v1", spec, 0.7), 0.7);
    }

    #[test]
    fn test_model_override_not_applicable() {
        let spec = find_by_name("openai").unwrap();
        assert_eq!(apply_model_overrides("kimi-k2.5", spec, 0.5), 0.5);
    }

    #[test]
    fn test_resolve_api_key_prefers_config() {
        let spec = find_by_name("deepseek").unwrap();
        let config = ProviderConfig {
            api_key: "from-config".to_string(),
            ..Default::default()
        };
        assert_eq!(
            resolve_api_key(Some(&config), spec).as_deref(),
            Some("from-config")
        );
    }

    #[test]
    fn test_resolve_api_key_env_fallback() {
        let spec = find_by_name("minimax").unwrap();
        std::env::set_var("MINIMAX_API_KEY", "from-env");
        let key = resolve_api_key(Some(&ProviderConfig::default()), spec);
        std::env::remove_var("MINIMAX_API_KEY");
        assert_eq!(key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_all_providers_have_unique_names() {
        let names: Vec<&str> = PROVIDERS.iter().map(|s| s.name).collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(names.len(), unique.len(), "Duplicate provider names found");
    }
}
