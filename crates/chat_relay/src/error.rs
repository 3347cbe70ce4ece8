use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chat_relay_contract::{ErrorBody, ErrorKind};
use serde_json::{json, Value};
use thiserror::Error;

const DASHBOARD_CHECK: &str =
    "Check the environment variables configured for the chat relay deployment";

/// Everything a chat request can fail with. Each variant renders as an [`ErrorBody`].
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Method not allowed. Use POST.")]
    MethodNotAllowed,

    #[error("Server configuration error: Missing OPENAI_API_KEY or OPEN_API environment variable")]
    MissingCredential,

    #[error("Invalid API key format. OpenAI API keys should start with 'sk-'")]
    MalformedCredential,

    #[error("Missing or invalid messages array")]
    InvalidMessages,

    #[error("Request body too large. The limit is 2 MB.")]
    PayloadTooLarge,

    /// The upstream refused the configured credential.
    #[error("Invalid API key. Please check your OPENAI_API_KEY or OPEN_API environment variable.")]
    RejectedCredential { status: StatusCode },

    #[error("{message}")]
    Upstream {
        status: StatusCode,
        message: String,
        /// The upstream `error` object, when it sent one.
        details: Option<Value>,
    },

    #[error("Request timeout. The AI is taking too long to respond. Please try again.")]
    Timeout(Duration),

    #[error("Failed to communicate with OpenAI API")]
    Transport(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidMessages => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MissingCredential | Self::MalformedCredential | Self::Transport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::RejectedCredential { status } | Self::Upstream { status, .. } => *status,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MethodNotAllowed => ErrorKind::MethodNotAllowed,
            Self::InvalidMessages | Self::PayloadTooLarge => ErrorKind::InvalidRequest,
            Self::MissingCredential | Self::MalformedCredential | Self::RejectedCredential { .. } => {
                ErrorKind::Configuration
            }
            Self::Upstream { status, .. } => match *status {
                StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
                StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimited,
                _ => ErrorKind::Upstream,
            },
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            Self::MethodNotAllowed | Self::InvalidMessages | Self::PayloadTooLarge => None,
            Self::MissingCredential => Some(json!({
                "hint": "Set OPENAI_API_KEY (or OPEN_API) in the relay's environment",
                "check": DASHBOARD_CHECK,
            })),
            Self::MalformedCredential => Some(json!({
                "hint": "The configured key does not look like an OpenAI API key",
                "check": "Make sure the API key value starts with 'sk-'",
            })),
            Self::RejectedCredential { .. } => Some(json!({
                "hint": "Make sure the API key starts with 'sk-' and is still active",
                "check": DASHBOARD_CHECK,
            })),
            Self::Upstream { details, .. } => details.clone(),
            Self::Timeout(limit) => Some(json!({
                "message": format!("Timeout after {} seconds", limit.as_secs()),
            })),
            Self::Transport(cause) => Some(json!({
                "message": cause,
                "hint": "Check the relay's internet connection and OpenAI API status",
                "check": "Visit https://status.openai.com to check API status",
            })),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
            details: self.details(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("chat request failed with {status}: {self}");
        } else {
            log::warn!("chat request rejected with {status}: {self}");
        }
        (status, Json(self.body())).into_response()
    }
}
