//! Relay client seam and its HTTP implementation.

use std::{future::Future, pin::Pin};

use chat_relay_contract::{completion_text, ChatRequest, ErrorBody, ErrorKind, WireMessage};
use thiserror::Error;

/// Reply used when the relay answers without any completion text.
pub const EMPTY_COMPLETION_REPLY: &str = "I apologize, but I could not generate a response.";

/// Object-safe boxed future used by [`RelayClient`].
pub type RelayFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RelayClientError {
    /// The relay answered with an error status.
    #[error("{message}")]
    Relay {
        status: u16,
        /// Category reported by the relay, when its body carried one.
        kind: Option<ErrorKind>,
        message: String,
    },
    /// The relay could not be reached.
    #[error("network error: {0}")]
    Network(String),
    /// The relay answered 2xx with a body that is not a completion.
    #[error("Invalid response from API")]
    InvalidResponse,
}

impl RelayClientError {
    /// Failure category, mapping unreachable relays to [`ErrorKind::Transport`].
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Relay { kind, .. } => *kind,
            Self::Network(_) => Some(ErrorKind::Transport),
            Self::InvalidResponse => None,
        }
    }
}

/// Sends a conversation to the relay and returns the assistant's reply text.
pub trait RelayClient {
    /// Requests a completion for `messages`.
    fn complete<'a>(
        &'a self,
        messages: &'a [WireMessage],
    ) -> RelayFuture<'a, Result<String, RelayClientError>>;
}

/// [`RelayClient`] that posts to a relay endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpRelayClient {
    /// Targets `endpoint`, the full chat URL (for example `http://localhost:3000/api/chat`).
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RelayClient for HttpRelayClient {
    fn complete<'a>(
        &'a self,
        messages: &'a [WireMessage],
    ) -> RelayFuture<'a, Result<String, RelayClientError>> {
        Box::pin(async move {
            let request = ChatRequest {
                messages: messages.to_vec(),
            };
            let response = self
                .http
                .post(&self.endpoint)
                .json(&request)
                .send()
                .await
                .map_err(|err| RelayClientError::Network(err.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(|err| RelayClientError::Network(err.to_string()))?;
            interpret_response(status, &body)
        })
    }
}

/// Turns a relay status and body into reply text or a typed error.
pub fn interpret_response(status: u16, body: &[u8]) -> Result<String, RelayClientError> {
    if !(200..300).contains(&status) {
        let (kind, message) = match serde_json::from_slice::<ErrorBody>(body) {
            Ok(error) => (Some(error.kind), error.error),
            Err(_) => (None, format!("HTTP {status}")),
        };
        log::warn!("chat relay returned {status}: {message}");
        return Err(RelayClientError::Relay {
            status,
            kind,
            message,
        });
    }

    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| RelayClientError::InvalidResponse)?;
    let message = value
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .ok_or(RelayClientError::InvalidResponse)?;
    if message.is_null() {
        return Err(RelayClientError::InvalidResponse);
    }
    Ok(completion_text(&value)
        .filter(|text| !text.is_empty())
        .unwrap_or(EMPTY_COMPLETION_REPLY)
        .to_string())
}
