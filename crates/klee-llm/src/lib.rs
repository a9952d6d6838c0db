//! Model registry and dispatch service.
//!
//! - [`registry::ModelRegistry`] — immutable catalog of named models with one default,
//!   built once at startup via [`registry::RegistryBuilder`] or from the config file
//! - [`service::LlmService`] — resolves a model, performs exactly one provider call,
//!   and returns a normalized [`klee_core::types::ChatResponse`]
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use klee_core::{config::load_config, types::Message};
//! use klee_llm::{LlmService, ModelRegistry};
//!
//! let registry = ModelRegistry::from_config(&load_config(None))?;
//! let service = LlmService::new(Arc::new(registry));
//! let reply = service.call(&[Message::human("hi")], None).await?;
//! println!("{} said: {}", reply.model_used, reply.content);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod registry;
pub mod service;

pub use error::{CancelReason, DispatchError, RegistryError};
pub use registry::{ModelEntry, ModelRegistry, RegistryBuilder};
pub use service::{CallOptions, LlmService};
pub use tokio_util::sync::CancellationToken;

#[cfg(test)]
pub(crate) mod testing;
