use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chat_relay_contract::{ChatRequest, HealthStatus, WireMessage};
use chrono::{SecondsFormat, Utc};

use crate::{error::RelayError, upstream, RelayState};

/// `POST /api/chat`.
///
/// The credential is checked before the body so a misconfigured relay reports that first.
pub(crate) async fn chat(
    State(state): State<RelayState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, RelayError> {
    let api_key = state.config.credential()?;
    let body = body.map_err(body_error)?;
    let messages = parse_messages(&body)?;
    log::info!("relaying {} chat messages upstream", messages.len());

    let completion = upstream::complete(&state.http, &state.config, api_key, &messages).await?;
    Ok(Json(completion).into_response())
}

/// Plain `OPTIONS /api/chat`; the CORS layer adds the allow headers.
pub(crate) async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub(crate) async fn method_not_allowed() -> RelayError {
    RelayError::MethodNotAllowed
}

/// `GET /api/test`.
pub(crate) async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        message: "Chat relay is running!".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

fn body_error(rejection: BytesRejection) -> RelayError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RelayError::PayloadTooLarge
    } else {
        log::debug!("unreadable chat body: {}", rejection.body_text());
        RelayError::InvalidMessages
    }
}

/// Reads the message list. An empty list is rejected along with malformed ones, which is
/// stricter than a bare array check: a completion request without messages always fails
/// upstream.
fn parse_messages(body: &[u8]) -> Result<Vec<WireMessage>, RelayError> {
    serde_json::from_slice::<ChatRequest>(body)
        .ok()
        .map(|request| request.messages)
        .filter(|messages| !messages.is_empty())
        .ok_or(RelayError::InvalidMessages)
}
