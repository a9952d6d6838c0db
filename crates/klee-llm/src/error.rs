//! Registry construction and dispatch error types.

use klee_providers::{SetupError, TransportError};
use thiserror::Error;

/// Startup-time registry misconfiguration. Fatal: no registry, no service.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no models registered")]
    Empty,

    #[error("model names must not be empty")]
    EmptyName,

    #[error("model '{0}' registered more than once")]
    DuplicateName(String),

    #[error("no default model designated")]
    NoDefault,

    #[error("default model '{0}' is not registered")]
    UnknownDefault(String),

    #[error("model '{model}': {source}")]
    Provider {
        model: String,
        #[source]
        source: SetupError,
    },
}

/// Why an in-flight call was abandoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller's cancellation token fired.
    Signal,
    /// The caller's deadline elapsed.
    Deadline,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::Signal => f.write_str("cancelled by caller"),
            CancelReason::Deadline => f.write_str("deadline exceeded"),
        }
    }
}

/// Outcome of a failed `LlmService::call`.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The requested model name is not registered.
    #[error("unknown model '{name}'")]
    UnknownModel { name: String },

    /// The resolved provider failed. Never retried, never re-routed.
    #[error("call to model '{model}' failed: {source}")]
    ProviderCallFailed {
        model: String,
        #[source]
        source: TransportError,
    },

    /// The call was abandoned before the provider answered.
    #[error("call to model '{model}' aborted: {reason}")]
    Cancelled { model: String, reason: CancelReason },

    /// `call` needs at least one message.
    #[error("conversation has no messages")]
    EmptyConversation,
}

impl DispatchError {
    /// Registry name of the model the call targeted, when one was resolved.
    pub fn model(&self) -> Option<&str> {
        match self {
            DispatchError::ProviderCallFailed { model, .. }
            | DispatchError::Cancelled { model, .. } => Some(model),
            DispatchError::UnknownModel { .. } | DispatchError::EmptyConversation => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_provider_call_failed_keeps_source() {
        let err = DispatchError::ProviderCallFailed {
            model: "default-model".to_string(),
            source: TransportError::EmptyResponse,
        };
        assert_eq!(err.model(), Some("default-model"));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("default-model"));
    }

    #[test]
    fn test_unknown_model_has_no_resolved_model() {
        let err = DispatchError::UnknownModel {
            name: "nope".to_string(),
        };
        assert_eq!(err.model(), None);
        assert_eq!(err.to_string(), "unknown model 'nope'");
    }

    #[test]
    fn test_cancel_reason_display() {
        let err = DispatchError::Cancelled {
            model: "m".to_string(),
            reason: CancelReason::Deadline,
        };
        assert!(err.to_string().contains("deadline exceeded"));
    }
}
