//! Wire contract for the chat relay: request and error payloads shared by the relay server and
//! the assistant's HTTP client.
//!
//! Success responses are the upstream completion body passed through untouched, so the only
//! helper for them is [`completion_text`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat completion route.
pub const CHAT_PATH: &str = "/api/chat";
/// Liveness route.
pub const HEALTH_PATH: &str = "/api/test";

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions prepended by the client.
    System,
    /// The person typing.
    User,
    /// The model.
    Assistant,
}

impl ChatRole {
    /// Returns the wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Message author.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

impl WireMessage {
    /// Creates a message.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far, oldest first.
    pub messages: Vec<WireMessage>,
}

/// Failure categories reported in every relay error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request body was malformed.
    InvalidRequest,
    /// Wrong HTTP method.
    MethodNotAllowed,
    /// The relay's upstream credential is missing or malformed.
    Configuration,
    /// The upstream rejected the credential.
    Authentication,
    /// The upstream is throttling.
    RateLimited,
    /// The upstream returned another failure status.
    Upstream,
    /// The upstream did not answer in time.
    Timeout,
    /// The upstream could not be reached.
    Transport,
}

impl ErrorKind {
    /// Returns the wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::Configuration => "configuration",
            Self::Authentication => "authentication",
            Self::RateLimited => "rate_limited",
            Self::Upstream => "upstream",
            Self::Timeout => "timeout",
            Self::Transport => "transport",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body of every relay error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable category.
    pub kind: ErrorKind,
    /// Extra diagnostics (upstream payload, configuration hints).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Body of `GET /api/test`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `"ok"`.
    pub status: String,
    /// Fixed greeting.
    pub message: String,
    /// RFC 3339 server time.
    pub timestamp: String,
}

/// Extracts `choices[0].message.content` from a completion body.
pub fn completion_text(body: &Value) -> Option<&str> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn error_body_serializes_kind_in_snake_case_and_skips_empty_details() {
        let body = ErrorBody {
            error: "slow down".to_string(),
            kind: ErrorKind::RateLimited,
            details: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"error": "slow down", "kind": "rate_limited"})
        );
    }

    #[test]
    fn completion_text_reads_first_choice() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "hi"}}]});
        assert_eq!(completion_text(&body), Some("hi"));
        assert_eq!(completion_text(&json!({"choices": []})), None);
    }

    #[test]
    fn roles_use_lowercase_wire_names() {
        let request: ChatRequest = serde_json::from_value(json!({
            "messages": [{"role": "system", "content": "be brief"}]
        }))
        .unwrap();
        assert_eq!(request.messages[0].role, ChatRole::System);
        assert_eq!(ChatRole::Assistant.as_str(), "assistant");
    }
}
