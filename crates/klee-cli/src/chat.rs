//! `klee chat -m MESSAGE` — one call, one printed reply.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use klee_core::types::Message;
use klee_llm::{CallOptions, CancellationToken, LlmService};

use crate::helpers;

/// Per-session chat settings from the command line.
#[derive(Clone, Debug, Default)]
pub struct ChatOptions {
    pub model: Option<String>,
    pub system: Option<String>,
    pub timeout: Option<Duration>,
}

impl ChatOptions {
    /// Leading messages for a fresh conversation.
    pub fn preamble(&self) -> Vec<Message> {
        self.system.iter().map(Message::system).collect()
    }

    /// Call options with a fresh cancellation token.
    pub fn call_options(&self, token: CancellationToken) -> CallOptions {
        let opts = CallOptions::new().with_cancel(token);
        match self.timeout {
            Some(timeout) => opts.with_timeout(timeout),
            None => opts,
        }
    }
}

/// Send a single message and print the reply.
pub async fn run_once(service: &LlmService, message: &str, opts: &ChatOptions) -> Result<()> {
    let mut messages = opts.preamble();
    messages.push(Message::human(message));

    let token = CancellationToken::new();
    let ctrl_c = helpers::cancel_on_ctrl_c(token.clone());

    info!(model = opts.model.as_deref().unwrap_or("<default>"), "single-shot chat");
    let result = service
        .call_with(&messages, opts.model.as_deref(), &opts.call_options(token))
        .await;
    ctrl_c.abort();

    let response = result.context("chat call failed")?;
    helpers::print_response(&response.model_used, &response.content);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use klee_core::types::Role;

    #[test]
    fn preamble_with_system_prompt() {
        let opts = ChatOptions {
            system: Some("Be brief.".to_string()),
            ..Default::default()
        };
        let preamble = opts.preamble();
        assert_eq!(preamble.len(), 1);
        assert_eq!(preamble[0].role, Role::System);
    }

    #[test]
    fn preamble_without_system_prompt() {
        assert!(ChatOptions::default().preamble().is_empty());
    }

    #[test]
    fn call_options_carry_timeout() {
        let opts = ChatOptions {
            timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        let call = opts.call_options(CancellationToken::new());
        assert_eq!(call.timeout, Some(Duration::from_secs(5)));
        assert!(call.cancel.is_some());
    }
}
