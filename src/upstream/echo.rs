//! The upstream echo service.
//!
//! Stateless: every call builds a fresh [`UpstreamPayload`] stamped with the
//! current time. There is no error path beyond rejecting unknown methods.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::Method,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::http::method::ProxyMethod;
use crate::http::response::ApiError;

/// Default identity of the echo service.
pub const DEFAULT_SERVICE_ID: &str = "upstream";

/// Largest body the echo service accepts. Kept above the gateway's default
/// inbound cap so anything the gateway forwards comes back.
pub const ECHO_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Body returned by the echo operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamPayload {
    /// ISO-8601 (RFC 3339) instant the payload was generated.
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub service_id: String,
    /// The request body, for POST and PUT only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub echoed_payload: Option<Value>,
}

impl UpstreamPayload {
    pub fn new(method: ProxyMethod, body: Option<Value>, service_id: &str) -> Self {
        let message = match method {
            ProxyMethod::Get => "Hello from upstream".to_string(),
            other => format!("Hello from upstream ({})", other),
        };
        Self {
            timestamp: Utc::now(),
            message,
            service_id: service_id.to_string(),
            echoed_payload: if method.carries_body() { body } else { None },
        }
    }
}

/// Liveness answer of the echo service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoHealth {
    pub status: String,
}

#[derive(Clone)]
struct EchoState {
    service_id: Arc<str>,
}

/// Build the echo service router.
pub fn router(service_id: &str) -> Router {
    let state = EchoState {
        service_id: Arc::from(service_id),
    };

    Router::new()
        .route("/echo", any(echo_handler))
        .route("/api/backend_to_upstream", any(echo_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(ECHO_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}

async fn echo_handler(State(state): State<EchoState>, method: Method, body: Bytes) -> Response {
    let method = match ProxyMethod::try_from(&method) {
        Ok(m) => m,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let payload = if method.carries_body() { lenient_json(&body) } else { None };
    tracing::debug!(method = %method, has_payload = payload.is_some(), "Echoing request");

    Json(UpstreamPayload::new(method, payload, &state.service_id)).into_response()
}

async fn health_handler() -> Json<EchoHealth> {
    Json(EchoHealth {
        status: "UP".to_string(),
    })
}

/// Empty → nothing; JSON → the value; anything else is echoed as a string.
fn lenient_json(body: &Bytes) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(body).into_owned())),
    }
}
