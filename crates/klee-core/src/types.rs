//! Core types for Klee — chat messages, normalized responses, and the
//! OpenAI-compatible wire format every HTTP provider speaks.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────

/// Who authored a chat turn.
///
/// On the wire the human role is spelled `"user"` (OpenAI format).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "user")]
    Human,
    #[serde(rename = "assistant")]
    Assistant,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::Human => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn in a chat exchange.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a message with an explicit role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Message {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a human (caller) message.
    pub fn human(content: impl Into<String>) -> Self {
        Self::new(Role::Human, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Whether this turn was authored by the caller.
    pub fn is_human(&self) -> bool {
        self.role == Role::Human
    }
}

// ─────────────────────────────────────────────
// Normalized response
// ─────────────────────────────────────────────

/// Provider-independent result of a dispatched chat call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatResponse {
    /// Text returned by the provider. Never empty on success.
    pub content: String,
    /// Registry name of the model that produced `content`.
    pub model_used: String,
}

// ─────────────────────────────────────────────
// OpenAI-compatible wire types
// ─────────────────────────────────────────────

/// Request body for an OpenAI-compatible chat completion API.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Raw chat completion response from an OpenAI-compatible API.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// A single choice in a chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
    pub finish_reason: Option<String>,
}

/// The assistant message within a chat completion choice.
#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
    /// Reasoning/thinking content from models like DeepSeek-R1.
    #[serde(default)]
    pub reasoning_content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if it carries any non-blank content.
    pub fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_human_message_serializes_as_user() {
        let msg = Message::human("Hello, world!");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "Hello, world!");
    }

    #[test]
    fn test_system_and_assistant_roles() {
        let system = serde_json::to_value(Message::system("Be brief.")).unwrap();
        let assistant = serde_json::to_value(Message::assistant("Sure.")).unwrap();

        assert_eq!(system["role"], "system");
        assert_eq!(assistant["role"], "assistant");
    }

    #[test]
    fn test_message_deserialization() {
        let msg: Message =
            serde_json::from_value(json!({"role": "user", "content": "Hi there"})).unwrap();
        assert!(msg.is_human());
        assert_eq!(msg.content, "Hi there");
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result: Result<Message, _> =
            serde_json::from_value(json!({"role": "tool", "content": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_role_display_matches_wire_name() {
        assert_eq!(Role::Human.to_string(), "user");
        assert_eq!(Role::System.to_string(), "system");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_chat_request_serialization() {
        let messages = vec![Message::system("You are Klee."), Message::human("Hello")];
        let request = ChatCompletionRequest {
            model: "deepseek-ai/DeepSeek-V3.2",
            messages: &messages,
            max_tokens: Some(4096),
            temperature: Some(0.7),
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "deepseek-ai/DeepSeek-V3.2");
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 4096);
        assert_eq!(json["temperature"], 0.7);
    }

    #[test]
    fn test_chat_request_omits_unset_params() {
        let messages = vec![Message::human("Hello")];
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            max_tokens: None,
            temperature: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_completion_response_text() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-abc123",
            "choices": [{
                "message": { "content": "Hello! How can I help?" },
                "finish_reason": "stop"
            }]
        }))
        .unwrap();

        assert_eq!(resp.into_text().as_deref(), Some("Hello! How can I help?"));
    }

    #[test]
    fn test_completion_response_empty_choices() {
        let resp: ChatCompletionResponse =
            serde_json::from_value(json!({"id": "chatcmpl-empty", "choices": []})).unwrap();
        assert!(resp.into_text().is_none());
    }

    #[test]
    fn test_completion_response_blank_content() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "content": "  " }, "finish_reason": "stop" }]
        }))
        .unwrap();
        assert!(resp.into_text().is_none());
    }

    #[test]
    fn test_completion_response_with_reasoning() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "content": "42",
                    "reasoning_content": "Let me think step by step..."
                },
                "finish_reason": "stop"
            }]
        }))
        .unwrap();

        assert_eq!(
            resp.choices[0].message.reasoning_content.as_deref(),
            Some("Let me think step by step...")
        );
        assert_eq!(resp.into_text().as_deref(), Some("42"));
    }
}
