//! Config loader — reads `~/.klee/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.klee/config.json`
//! 3. Environment variables `KLEE_<SECTION>__<FIELD>` (override JSON)

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Supported overrides:
/// - `KLEE_DEFAULT_MODEL` → `defaultModel`
/// - `KLEE_PROVIDERS__<NAME>__API_KEY` → `providers.<name>.apiKey`
/// - `KLEE_PROVIDERS__<NAME>__API_BASE` → `providers.<name>.apiBase`
/// - `KLEE_LOGGING__JSON` → `logging.json`
///
/// Provider overrides apply to every vendor named in `providers` or referenced
/// by a model; a missing provider section is created on demand.
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("KLEE_DEFAULT_MODEL") {
        config.default_model = val;
    }

    let vendors: BTreeSet<String> = config
        .providers
        .keys()
        .cloned()
        .chain(config.models.iter().map(|m| m.provider.clone()))
        .filter(|name| !name.is_empty())
        .collect();

    for vendor in vendors {
        let env_name = vendor.to_uppercase().replace('-', "_");
        let api_key = std::env::var(format!("KLEE_PROVIDERS__{env_name}__API_KEY")).ok();
        let api_base = std::env::var(format!("KLEE_PROVIDERS__{env_name}__API_BASE")).ok();
        if api_key.is_none() && api_base.is_none() {
            continue;
        }

        let provider = config.providers.entry(vendor).or_default();
        if let Some(key) = api_key {
            provider.api_key = key;
        }
        if let Some(base) = api_base {
            provider.api_base = Some(base);
        }
    }

    if let Ok(val) = std::env::var("KLEE_LOGGING__JSON") {
        config.logging.json = val == "true" || val == "1";
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
