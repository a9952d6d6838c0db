//! In-process providers for registry and dispatch tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use klee_core::config::ModelConfig;
use klee_core::types::Message;
use klee_providers::{LlmProvider, TransportError};

pub fn model(name: &str) -> ModelConfig {
    ModelConfig::new(name, "mock", format!("remote/{name}"))
}

/// Always answers with the same text; records every conversation it receives.
pub struct StaticProvider {
    reply: String,
    pub seen: Mutex<Vec<Vec<Message>>>,
}

impl StaticProvider {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn arc(reply: &str) -> Arc<dyn LlmProvider> {
        Arc::new(Self::new(reply))
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for StaticProvider {
    async fn send(&self, messages: &[Message]) -> Result<String, TransportError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        Ok(self.reply.clone())
    }

    fn remote_model(&self) -> &str {
        "static"
    }

    fn display_name(&self) -> &str {
        "Static"
    }
}

/// Always fails with an API error.
pub struct FailingProvider {
    pub calls: Mutex<usize>,
}

impl FailingProvider {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl LlmProvider for FailingProvider {
    async fn send(&self, _messages: &[Message]) -> Result<String, TransportError> {
        *self.calls.lock().unwrap() += 1;
        Err(TransportError::Api {
            status: 503,
            body: "upstream unavailable".to_string(),
        })
    }

    fn remote_model(&self) -> &str {
        "failing"
    }

    fn display_name(&self) -> &str {
        "Failing"
    }
}

/// Answers only after a long delay.
pub struct SlowProvider {
    pub delay: Duration,
}

#[async_trait]
impl LlmProvider for SlowProvider {
    async fn send(&self, _messages: &[Message]) -> Result<String, TransportError> {
        tokio::time::sleep(self.delay).await;
        Ok("too late".to_string())
    }

    fn remote_model(&self) -> &str {
        "slow"
    }

    fn display_name(&self) -> &str {
        "Slow"
    }
}
