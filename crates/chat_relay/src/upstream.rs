//! The call to the external chat-completion API.

use axum::http::StatusCode;
use chat_relay_contract::WireMessage;
use serde::Serialize;
use serde_json::Value;

use crate::{config::RelayConfig, error::RelayError};

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.9;
const FREQUENCY_PENALTY: f32 = 0.2;
const PRESENCE_PENALTY: f32 = 0.2;

const DEFAULT_UPSTREAM_MESSAGE: &str = "OpenAI API error";

/// Body sent upstream. Generation parameters are fixed server-side; callers only supply messages.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [WireMessage],
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub stream: bool,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(model: &'a str, messages: &'a [WireMessage]) -> Self {
        Self {
            model,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
            stream: false,
        }
    }
}

/// Forwards `messages` upstream and returns the completion body untouched.
///
/// The whole exchange, including reading the body, is bounded by `config.timeout`.
pub async fn complete(
    http: &reqwest::Client,
    config: &RelayConfig,
    api_key: &str,
    messages: &[WireMessage],
) -> Result<Value, RelayError> {
    let request = CompletionRequest::new(&config.model, messages);
    let exchange = async {
        let response = http
            .post(config.completions_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok::<_, reqwest::Error>((status, body))
    };

    let (status, body) = match tokio::time::timeout(config.timeout, exchange).await {
        Ok(Ok(reply)) => reply,
        Ok(Err(err)) => {
            log::error!("upstream request failed: {err}");
            return Err(RelayError::Transport(err.to_string()));
        }
        Err(_) => {
            log::warn!("upstream did not answer within {:?}", config.timeout);
            return Err(RelayError::Timeout(config.timeout));
        }
    };

    log::debug!("upstream answered {status}");
    let payload = serde_json::from_slice::<Value>(&body).ok();
    if status.is_success() {
        return payload
            .ok_or_else(|| RelayError::Transport("upstream returned a non-JSON body".to_string()));
    }

    log::warn!("upstream returned {status}");
    Err(classify_failure(status, payload.as_ref()))
}

/// Maps an upstream error response to the error the relay reports.
///
/// Rejected credentials become a configuration error so the operator, not the user, is pointed at
/// the fix. Everything else keeps the upstream status and message.
pub fn classify_failure(status: StatusCode, payload: Option<&Value>) -> RelayError {
    let error = payload.and_then(|body| body.get("error"));
    let message = error
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_UPSTREAM_MESSAGE);
    let code = error
        .and_then(|error| error.get("code"))
        .and_then(Value::as_str);

    if code == Some("invalid_api_key") || message.contains("Incorrect API key") {
        return RelayError::RejectedCredential { status };
    }
    RelayError::Upstream {
        status,
        message: message.to_string(),
        details: error.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use chat_relay_contract::{ChatRole, ErrorKind};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn request_carries_fixed_generation_parameters() {
        let messages = [WireMessage::new(ChatRole::User, "hi")];
        let body = serde_json::to_value(CompletionRequest::new("gpt-3.5-turbo", &messages))
            .unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"], json!([{"role": "user", "content": "hi"}]));
    }

    #[test]
    fn invalid_key_is_remapped_to_configuration() {
        let payload = json!({"error": {"message": "bad", "code": "invalid_api_key"}});
        let err = classify_failure(StatusCode::UNAUTHORIZED, Some(&payload));
        assert!(matches!(err, RelayError::RejectedCredential { .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let payload = json!({"error": {"message": "Incorrect API key provided: sk-***"}});
        let err = classify_failure(StatusCode::UNAUTHORIZED, Some(&payload));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn other_failures_keep_status_and_message() {
        let payload = json!({"error": {"message": "Rate limit reached", "type": "requests"}});
        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, Some(&payload));
        assert_eq!(err.to_string(), "Rate limit reached");
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert_eq!(
            err.body().details,
            Some(json!({"message": "Rate limit reached", "type": "requests"}))
        );

        let err = classify_failure(StatusCode::BAD_GATEWAY, None);
        assert_eq!(err.to_string(), "OpenAI API error");
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }
}
