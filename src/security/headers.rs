//! CORS handling.
//!
//! The dashboard that drives the gateway is served from a different origin,
//! so browsers need preflight answers for every proxied method.

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::config::SecurityConfig;
use crate::http::request::X_REQUEST_ID;

/// Permissive CORS when enabled; otherwise a layer that allows nothing.
pub fn cors_layer(config: &SecurityConfig) -> CorsLayer {
    if !config.cors_allow_any {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, X_REQUEST_ID])
        .expose_headers([X_REQUEST_ID])
}
