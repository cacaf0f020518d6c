//! Outbound HTTP client for the upstream service.
//!
//! # Responsibilities
//! - Build one request per call (method, JSON body, request ID)
//! - Enforce the caller's deadline over connect, send and body read
//! - Classify failures into [`UpstreamError`]
//!
//! # Design Decisions
//! - Exactly one attempt per call; nothing here retries
//! - Plain HTTP only (no TLS connector)

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, Method, Request, Response, StatusCode, Uri};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::Value;
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::http::method::ProxyMethod;
use crate::http::request::X_REQUEST_ID;
use crate::resilience::timeouts::with_timeout;
use crate::upstream::echo::UpstreamPayload;
use crate::upstream::error::{error_chain, UpstreamError};

/// Room on top of the echoed body for the rest of the upstream payload.
const RESPONSE_HEADROOM: usize = 64 * 1024;

/// Largest upstream response buffered when inbound bodies are capped at
/// `max_body_size`. The echo repeats the body, so the cap must cover it.
pub fn response_limit(max_body_size: usize) -> usize {
    max_body_size.saturating_add(RESPONSE_HEADROOM)
}

/// Client bound to a single upstream service.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client<HttpConnector, Body>,
    echo_uri: Uri,
    health_uri: Uri,
    max_response_bytes: usize,
}

impl UpstreamClient {
    /// Create a client for the configured upstream that buffers at most
    /// `max_response_bytes` of each response.
    pub fn new(config: &UpstreamConfig, max_response_bytes: usize) -> Result<Self, UpstreamError> {
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(30))
            .build(HttpConnector::new());

        Ok(Self {
            client,
            echo_uri: join_uri(&config.base_url, &config.echo_path)?,
            health_uri: join_uri(&config.base_url, &config.health_path)?,
            max_response_bytes,
        })
    }

    pub fn echo_uri(&self) -> &Uri {
        &self.echo_uri
    }

    pub fn health_uri(&self) -> &Uri {
        &self.health_uri
    }

    /// Call the echo operation with the same method and (for POST/PUT) body.
    pub async fn echo(
        &self,
        method: ProxyMethod,
        body: Option<&Value>,
        request_id: Option<&str>,
        timeout: Duration,
    ) -> Result<UpstreamPayload, UpstreamError> {
        let body = match body {
            Some(value) if method.carries_body() => Some(
                serde_json::to_vec(value).map_err(|e| UpstreamError::InvalidRequest(e.to_string()))?,
            ),
            _ => None,
        };
        let request = build_request(method.to_http(), &self.echo_uri, body, request_id)?;

        with_timeout(timeout, async {
            let (status, bytes) = self.send(request).await?;
            if !status.is_success() {
                return Err(UpstreamError::BadStatus { status: status.as_u16() });
            }
            serde_json::from_slice::<UpstreamPayload>(&bytes)
                .map_err(|e| UpstreamError::Malformed(e.to_string()))
        })
        .await
    }

    /// Probe the upstream liveness endpoint. Any 2xx counts as up.
    pub async fn probe_health(
        &self,
        request_id: Option<&str>,
        timeout: Duration,
    ) -> Result<(), UpstreamError> {
        let request = build_request(Method::GET, &self.health_uri, None, request_id)?;

        with_timeout(timeout, async {
            let (status, _) = self.send(request).await?;
            if status.is_success() {
                Ok(())
            } else {
                Err(UpstreamError::BadStatus { status: status.as_u16() })
            }
        })
        .await
    }

    async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Bytes), UpstreamError> {
        let response: Response<Incoming> = self.client.request(request).await.map_err(|e| {
            tracing::debug!(connect = e.is_connect(), error = %e, "Upstream transport error");
            UpstreamError::Unreachable(error_chain(&e))
        })?;

        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(Body::new(body), self.max_response_bytes)
            .await
            .map_err(|e| UpstreamError::Malformed(format!("failed to read body: {}", error_chain(&e))))?;

        Ok((parts.status, bytes))
    }
}

fn build_request(
    method: Method,
    uri: &Uri,
    body: Option<Vec<u8>>,
    request_id: Option<&str>,
) -> Result<Request<Body>, UpstreamError> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri.clone())
        .header(header::USER_AGENT, concat!("otel-gateway/", env!("CARGO_PKG_VERSION")))
        .header(header::ACCEPT, "application/json");

    if let Some(id) = request_id.and_then(|id| HeaderValue::from_str(id).ok()) {
        builder = builder.header(X_REQUEST_ID, id);
    }

    let body = match body {
        Some(bytes) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(bytes)
        }
        None => Body::empty(),
    };

    builder
        .body(body)
        .map_err(|e| UpstreamError::InvalidRequest(e.to_string()))
}

fn join_uri(base: &str, path: &str) -> Result<Uri, UpstreamError> {
    let joined = format!("{}{}", base.trim_end_matches('/'), path);
    joined
        .parse()
        .map_err(|e| UpstreamError::InvalidRequest(format!("'{}': {}", joined, e)))
}
