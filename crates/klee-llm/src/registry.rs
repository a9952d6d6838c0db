//! Model registry — the immutable catalog of callable models.
//!
//! Built once at startup (from code via [`RegistryBuilder`] or from the
//! config file via [`ModelRegistry::from_config`]) and shared read-only
//! afterwards. There is no mutation API: every name is validated up front so
//! that `UnknownModel` is the only way resolution can fail.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use klee_core::config::{Config, ModelConfig};
use klee_providers::{create_provider, LlmProvider};

use crate::error::{DispatchError, RegistryError};

// ─────────────────────────────────────────────
// ModelEntry
// ─────────────────────────────────────────────

/// A named model together with the transport that reaches it.
pub struct ModelEntry {
    config: ModelConfig,
    provider: Arc<dyn LlmProvider>,
}

impl ModelEntry {
    /// Registry name (unique within a registry).
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Vendor, remote model id, and sampling parameters for this entry.
    pub fn provider_config(&self) -> &ModelConfig {
        &self.config
    }

    /// Transport used to invoke this model.
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }
}

impl std::fmt::Debug for ModelEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelEntry")
            .field("name", &self.config.name)
            .field("provider", &self.provider.display_name())
            .field("remote_model", &self.provider.remote_model())
            .finish()
    }
}

// ─────────────────────────────────────────────
// ModelRegistry
// ─────────────────────────────────────────────

/// Ordered, read-only mapping from model name to [`ModelEntry`], plus a default.
#[derive(Debug)]
pub struct ModelRegistry {
    /// Entries in registration order.
    entries: Vec<ModelEntry>,
    /// Name → position in `entries`.
    index: HashMap<String, usize>,
    default_index: usize,
}

impl ModelRegistry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Build a registry with one HTTP provider per configured model.
    ///
    /// The default is `config.default_model`, or the first model when unset.
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        let mut builder = Self::builder();

        for model in &config.models {
            let provider = create_provider(model, &config.providers).map_err(|source| {
                RegistryError::Provider {
                    model: model.name.clone(),
                    source,
                }
            })?;
            builder = builder.register(model.clone(), Arc::new(provider));
        }

        if let Some(default) = config.effective_default_model() {
            builder = builder.default_model(default);
        }

        builder.build()
    }

    /// Every registered name, in registration order.
    pub fn get_all_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name()).collect()
    }

    /// Resolve a model by exact, case-sensitive name, or the default when `None`.
    pub fn resolve(&self, name: Option<&str>) -> Result<&ModelEntry, DispatchError> {
        match name {
            None => Ok(self.default_entry()),
            Some(name) => self.get(name).ok_or_else(|| DispatchError::UnknownModel {
                name: name.to_string(),
            }),
        }
    }

    /// Look up an entry by exact name.
    pub fn get(&self, name: &str) -> Option<&ModelEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Whether a model with this exact name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Name of the default model.
    pub fn default_name(&self) -> &str {
        self.default_entry().name()
    }

    /// The default entry.
    pub fn default_entry(&self) -> &ModelEntry {
        &self.entries[self.default_index]
    }

    /// Entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &ModelEntry> {
        self.entries.iter()
    }

    /// Number of registered models (always at least one).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a built registry; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────

/// Collects models and the default designation; validated by [`build`](Self::build).
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<ModelEntry>,
    default_name: Option<String>,
}

impl RegistryBuilder {
    /// Register a model under `config.name`.
    pub fn register(mut self, config: ModelConfig, provider: Arc<dyn LlmProvider>) -> Self {
        debug!(model = %config.name, provider = provider.display_name(), "registering model");
        self.entries.push(ModelEntry { config, provider });
        self
    }

    /// Designate the default model.
    pub fn default_model(mut self, name: impl Into<String>) -> Self {
        self.default_name = Some(name.into());
        self
    }

    /// Validate and freeze the registry.
    ///
    /// Fails when no model is registered, a name is empty or repeated, or the
    /// default is missing or unknown.
    pub fn build(self) -> Result<ModelRegistry, RegistryError> {
        if self.entries.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut index = HashMap::with_capacity(self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.name().is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if index.insert(entry.name().to_string(), i).is_some() {
                return Err(RegistryError::DuplicateName(entry.name().to_string()));
            }
        }

        let default_name = self.default_name.ok_or(RegistryError::NoDefault)?;
        let default_index = *index
            .get(&default_name)
            .ok_or(RegistryError::UnknownDefault(default_name.clone()))?;

        info!(
            models = self.entries.len(),
            default = %default_name,
            "model registry initialized"
        );

        Ok(ModelRegistry {
            entries: self.entries,
            index,
            default_index,
        })
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
