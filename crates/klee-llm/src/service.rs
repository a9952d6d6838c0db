//! Dispatch service — one resolved model, one provider call, one outcome.
//!
//! `LlmService` owns no mutable state. Each call resolves a model through the
//! shared registry, invokes that model's provider exactly once, and returns
//! either a normalized `ChatResponse` or a typed `DispatchError`. There is no
//! retry and no fallback to another model.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use klee_core::types::{ChatResponse, Message};
use klee_providers::{LlmProvider, TransportError};

use crate::error::{CancelReason, DispatchError};
use crate::registry::ModelRegistry;

// ─────────────────────────────────────────────
// Call options
// ─────────────────────────────────────────────

/// Caller-supplied cancellation and deadline for one call.
#[derive(Clone, Debug, Default)]
pub struct CallOptions {
    /// Abandon the provider call when this token fires.
    pub cancel: Option<CancellationToken>,
    /// Abandon the provider call after this long.
    pub timeout: Option<Duration>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// How the provider step ended.
enum Attempt {
    Finished(Result<String, TransportError>),
    Interrupted(CancelReason),
}

// ─────────────────────────────────────────────
// LlmService
// ─────────────────────────────────────────────

/// Stateless dispatch over a shared, read-only [`ModelRegistry`].
#[derive(Clone, Debug)]
pub struct LlmService {
    registry: Arc<ModelRegistry>,
}

impl LlmService {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this service dispatches over.
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Every registered model name, in registration order.
    pub fn model_names(&self) -> Vec<&str> {
        self.registry.get_all_names()
    }

    /// Call `model_name` (or the default model) with `messages`.
    pub async fn call(
        &self,
        messages: &[Message],
        model_name: Option<&str>,
    ) -> Result<ChatResponse, DispatchError> {
        self.call_with(messages, model_name, &CallOptions::default())
            .await
    }

    /// Like [`call`](Self::call), abandoning the provider call on cancellation
    /// or deadline.
    pub async fn call_with(
        &self,
        messages: &[Message],
        model_name: Option<&str>,
        options: &CallOptions,
    ) -> Result<ChatResponse, DispatchError> {
        let Some(last) = messages.last() else {
            warn!(
                event = "llm_call_rejected",
                model = model_name.unwrap_or("<default>"),
                outcome = "empty_conversation",
                "refusing to call a model without messages"
            );
            return Err(DispatchError::EmptyConversation);
        };

        let entry = match self.registry.resolve(model_name) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    event = "llm_call_rejected",
                    model = model_name.unwrap_or("<default>"),
                    outcome = "unknown_model",
                    "model is not registered"
                );
                return Err(e);
            }
        };
        let model = entry.name();

        if !last.is_human() {
            debug!(model, last_role = %last.role, "last message is not a human turn");
        }

        info!(
            event = "llm_call_started",
            model,
            provider = entry.provider().display_name(),
            remote_model = entry.provider().remote_model(),
            messages = messages.len(),
            explicit = model_name.is_some(),
            "dispatching chat call"
        );

        let started = Instant::now();
        let attempt = invoke(entry.provider().as_ref(), messages, options).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match attempt {
            Attempt::Finished(Ok(content)) => {
                info!(
                    event = "llm_call_finished",
                    model,
                    outcome = "success",
                    elapsed_ms,
                    chars = content.len(),
                    "chat call succeeded"
                );
                Ok(ChatResponse {
                    content,
                    model_used: model.to_string(),
                })
            }
            Attempt::Finished(Err(source)) => {
                warn!(
                    event = "llm_call_finished",
                    model,
                    outcome = "provider_error",
                    elapsed_ms,
                    error = %source,
                    "chat call failed"
                );
                Err(DispatchError::ProviderCallFailed {
                    model: model.to_string(),
                    source,
                })
            }
            Attempt::Interrupted(reason) => {
                warn!(
                    event = "llm_call_finished",
                    model,
                    outcome = "cancelled",
                    elapsed_ms,
                    reason = %reason,
                    "chat call abandoned"
                );
                Err(DispatchError::Cancelled {
                    model: model.to_string(),
                    reason,
                })
            }
        }
    }
}

/// Race the provider against the caller's token and deadline.
///
/// Cancellation is checked first, so an already-fired token never reaches the
/// provider. Losing the race drops the provider future, aborting its request.
async fn invoke(provider: &dyn LlmProvider, messages: &[Message], options: &CallOptions) -> Attempt {
    let cancelled = async {
        match &options.cancel {
            Some(token) => token.cancelled().await,
            None => std::future::pending::<()>().await,
        }
    };
    let deadline = async {
        match options.timeout {
            Some(timeout) => tokio::time::sleep(timeout).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        _ = cancelled => Attempt::Interrupted(CancelReason::Signal),
        _ = deadline => Attempt::Interrupted(CancelReason::Deadline),
        result = provider.send(messages) => Attempt::Finished(result),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
