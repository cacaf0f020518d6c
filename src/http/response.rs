//! Response mapping.
//!
//! # Responsibilities
//! - Map proxy envelopes to 200 / 503
//! - Map health answers to 200 (the endpoint itself never fails)
//! - Map inbound rejections to 4xx with a JSON error body
//!
//! # Design Decisions
//! - Rejections happen before any upstream call is attempted

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::gateway::ProxyEnvelope;
use crate::health::HealthStatus;
use crate::http::method::{UnsupportedMethod, ALLOWED_METHODS};

/// Inbound request rejected by the gateway itself.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    MethodNotAllowed(#[from] UnsupportedMethod),

    #[error("request body is not valid JSON: {0}")]
    InvalidBody(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response();
        if let ApiError::MethodNotAllowed(_) = self {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
        }
        response
    }
}

impl IntoResponse for ProxyEnvelope {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl IntoResponse for HealthStatus {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
