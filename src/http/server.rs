//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy and health handlers
//! - Wire up middleware (tracing, limits, request ID, CORS, timeout)
//! - Bind server to listener and shut down gracefully

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::gateway::Gateway;
use crate::http::method::ProxyMethod;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::ApiError;
use crate::observability::metrics;
use crate::observability::{CompositeObserver, MetricsObserver, RequestObserver, TracingObserver};
use crate::security::{headers::cors_layer, limits::body_limit_layer};
use crate::upstream::UpstreamError;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a server that logs and meters every upstream call.
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        let observer = CompositeObserver::new()
            .with(Arc::new(TracingObserver))
            .with(Arc::new(MetricsObserver));
        Self::with_observer(config, Arc::new(observer))
    }

    /// Create a server with a caller-chosen instrumentation strategy.
    pub fn with_observer(
        config: GatewayConfig,
        observer: Arc<dyn RequestObserver>,
    ) -> Result<Self, UpstreamError> {
        let gateway = Gateway::with_observer(&config, observer)?;
        let state = AppState {
            gateway: Arc::new(gateway),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The body limit stays outermost; the timeout and CORS layers need a
    /// response body that implements `Default`.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/proxy", any(proxy_handler))
            .route("/api/frontend_to_backend", any(proxy_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(body_limit_layer(&config.security))
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(cors_layer(&config.security))
                    .layer(TimeoutLayer::with_status_code(
                        StatusCode::REQUEST_TIMEOUT,
                        config.timeouts.handler(),
                    )),
            )
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            service_id = %self.config.service.id,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Proxy handler: validate method and body, then forward exactly once.
async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start_time = Instant::now();
    let request_id = headers.request_id();

    let response = match parse_proxy_request(&method, &body) {
        Ok((method, payload)) => {
            tracing::debug!(
                request_id = request_id.unwrap_or("-"),
                method = %method,
                "Proxying request"
            );
            state.gateway.proxy(method, payload, request_id).await.into_response()
        }
        Err(rejection) => {
            tracing::warn!(
                request_id = request_id.unwrap_or("-"),
                method = %method,
                error = %rejection,
                "Rejected proxy request"
            );
            rejection.into_response()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
    response
}

/// Aggregate health: always answers, probing the upstream on each call.
async fn health_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.gateway.health(headers.request_id()).await.into_response()
}

/// Restrict the method and decode the JSON body (POST/PUT only).
fn parse_proxy_request(method: &Method, body: &Bytes) -> Result<(ProxyMethod, Option<Value>), ApiError> {
    let method = ProxyMethod::try_from(method)?;
    if !method.carries_body() || body.is_empty() {
        return Ok((method, None));
    }
    let payload = serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    Ok((method, Some(payload)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    fn config() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        // Nothing listens on port 9; rejection paths must not reach it anyway.
        config.upstream.base_url = "http://127.0.0.1:9".into();
        config.timeouts.upstream_request_ms = 300;
        config.timeouts.health_probe_ms = 300;
        config
    }

    fn server() -> GatewayServer {
        GatewayServer::new(config()).unwrap()
    }

    async fn send(method: Method, uri: &str, body: &str) -> Response {
        server()
            .router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn body_ignored_for_get_and_delete() {
        let body = Bytes::from_static(b"not json");
        assert_eq!(parse_proxy_request(&Method::GET, &body).unwrap(), (ProxyMethod::Get, None));
        assert_eq!(parse_proxy_request(&Method::DELETE, &body).unwrap(), (ProxyMethod::Delete, None));
    }

    #[test]
    fn body_decoded_for_post() {
        let body = Bytes::from_static(br#"{"x":1}"#);
        assert_eq!(
            parse_proxy_request(&Method::POST, &body).unwrap(),
            (ProxyMethod::Post, Some(json!({"x": 1})))
        );
        assert_eq!(parse_proxy_request(&Method::PUT, &Bytes::new()).unwrap(), (ProxyMethod::Put, None));
    }

    #[tokio::test]
    async fn patch_is_rejected_with_405() {
        let response = send(Method::PATCH, "/proxy", "").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().contains_key("x-request-id"));
        assert!(json_body(response).await["error"].as_str().unwrap().contains("PATCH"));
    }

    #[tokio::test]
    async fn invalid_json_is_rejected_with_400() {
        let response = send(Method::POST, "/proxy", "{nope").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_with_413() {
        let mut config = config();
        config.security.max_body_size = 64;
        let body = format!(r#"{{"data":"{}"}}"#, "a".repeat(256));
        let length = body.len().to_string();

        let response = GatewayServer::new(config)
            .unwrap()
            .router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/proxy")
                    .header("content-type", "application/json")
                    .header("content-length", length)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn large_integers_survive_body_parsing() {
        let body = Bytes::from_static(br#"{"x":123456789012345678901234567890}"#);
        let (_, payload) = parse_proxy_request(&Method::POST, &body).unwrap();
        assert_eq!(payload.unwrap()["x"].to_string(), "123456789012345678901234567890");
    }

    #[tokio::test]
    async fn dead_upstream_gives_503_envelope() {
        let response = send(Method::GET, "/api/frontend_to_backend", "").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = json_body(response).await;
        assert_eq!(body["originServiceId"], "backend");
        assert_eq!(body["httpMethod"], "GET");
        assert!(body["upstreamResult"].is_null());
        assert!(body["errorDetail"].is_string());
    }

    #[tokio::test]
    async fn health_answers_200_when_upstream_down() {
        let response = send(Method::GET, "/health", "").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["selfStatus"], "UP");
        assert_eq!(body["dependencyStatus"], "DOWN");
        assert!(body["dependencyLatencyMs"].is_null());
    }

    #[tokio::test]
    async fn client_request_id_is_echoed() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-42");
    }
}
