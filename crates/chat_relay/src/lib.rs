//! Chat relay server: accepts `POST /api/chat` from the desktop assistant, injects the
//! server-held credential and forwards the conversation to the completion API.
//!
//! Every failure leaves the relay as a JSON [`chat_relay_contract::ErrorBody`] with a structured
//! [`chat_relay_contract::ErrorKind`], so clients never have to parse message text.

pub mod config;
pub mod error;
mod routes;
pub mod upstream;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use chat_relay_contract::{CHAT_PATH, HEALTH_PATH};
use tower_http::cors::{Any, CorsLayer};

pub use config::RelayConfig;
pub use error::RelayError;

/// Largest accepted request body.
pub const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Shared by every request.
#[derive(Debug, Clone)]
pub struct RelayState {
    config: Arc<RelayConfig>,
    http: reqwest::Client,
}

impl RelayState {
    pub fn new(config: RelayConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: RelayConfig, http: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            http,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Builds the relay's router with CORS and the body limit applied.
pub fn app(config: RelayConfig) -> Router {
    router(RelayState::new(config))
}

pub fn router(state: RelayState) -> Router {
    Router::new()
        .route(
            CHAT_PATH,
            post(routes::chat)
                .options(routes::preflight)
                .fallback(routes::method_not_allowed),
        )
        .route(HEALTH_PATH, get(routes::health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
