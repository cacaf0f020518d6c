//! Gateway core: the proxy and health operations.
//!
//! # Data Flow
//! ```text
//! proxy(method, body)
//!     → observer.on_start
//!     → UpstreamClient::echo (one attempt, bounded)
//!     → observer.on_finish
//!     → ProxyEnvelope (success | failure)
//!
//! health()
//!     → observer around UpstreamClient::probe_health (own bound)
//!     → HealthStatus
//! ```
//!
//! # Design Decisions
//! - No shared mutable state; handlers run fully independently
//! - Downstream failures become envelope/status values, never panics
//! - The observer sees every outbound call but cannot change the result

pub mod envelope;

use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

use crate::config::GatewayConfig;
use crate::health::{probe, HealthStatus};
use crate::http::method::ProxyMethod;
use crate::observability::{CallOutcome, NoopObserver, Operation, OutboundCall, RequestObserver};
use crate::upstream::{client::response_limit, UpstreamClient, UpstreamError};

pub use envelope::ProxyEnvelope;

/// The proxy/health-aggregation gateway.
#[derive(Clone)]
pub struct Gateway {
    client: UpstreamClient,
    service_id: Arc<str>,
    request_timeout: Duration,
    probe_timeout: Duration,
    probe_upstream: bool,
    observer: Arc<dyn RequestObserver>,
}

impl Gateway {
    /// Build a gateway with no observer.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, UpstreamError> {
        Self::with_observer(config, Arc::new(NoopObserver))
    }

    pub fn with_observer(
        config: &GatewayConfig,
        observer: Arc<dyn RequestObserver>,
    ) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: UpstreamClient::new(
                &config.upstream,
                response_limit(config.security.max_body_size),
            )?,
            service_id: Arc::from(config.service.id.as_str()),
            request_timeout: config.timeouts.upstream_request(),
            probe_timeout: config.timeouts.health_probe(),
            probe_upstream: config.health_check.probe_upstream,
            observer,
        })
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    /// Forward one request to the upstream echo operation and wrap the result.
    ///
    /// `body` is only forwarded for POST and PUT.
    pub async fn proxy(
        &self,
        method: ProxyMethod,
        body: Option<Value>,
        request_id: Option<&str>,
    ) -> ProxyEnvelope {
        let body = body.filter(|_| method.carries_body());
        let call = OutboundCall {
            operation: Operation::ProxyRequest,
            method,
            uri: self.client.echo_uri(),
            request_id,
        };

        let result = self
            .observed(
                call,
                self.client.echo(method, body.as_ref(), request_id, self.request_timeout),
            )
            .await;

        match result {
            Ok(payload) => ProxyEnvelope::success(&self.service_id, method, payload),
            Err(e) => {
                tracing::warn!(
                    request_id = request_id.unwrap_or("-"),
                    method = %method,
                    kind = e.kind(),
                    error = %e,
                    "Proxy request failed"
                );
                ProxyEnvelope::failure(&self.service_id, method, e.to_string())
            }
        }
    }

    /// Report own liveness plus a live probe of the upstream.
    pub async fn health(&self, request_id: Option<&str>) -> HealthStatus {
        if !self.probe_upstream {
            return HealthStatus::dependency_unknown();
        }

        let call = OutboundCall {
            operation: Operation::HealthProbe,
            method: ProxyMethod::Get,
            uri: self.client.health_uri(),
            request_id,
        };
        probe::measure(self.observed(call, self.client.probe_health(request_id, self.probe_timeout))).await
    }

    /// Run `fut` inside a client span, notifying the observer around it.
    async fn observed<T, F>(&self, call: OutboundCall<'_>, fut: F) -> Result<T, UpstreamError>
    where
        F: Future<Output = Result<T, UpstreamError>>,
    {
        let span = tracing::info_span!(
            "upstream_call",
            otel.name = call.operation.name(),
            otel.kind = "client",
            http.method = %call.method,
            request_id = call.request_id.unwrap_or("-"),
        );

        self.observer.on_start(&call);
        let started = Instant::now();
        let result = fut.instrument(span).await;
        self.observer.on_finish(
            &call,
            &CallOutcome {
                elapsed: started.elapsed(),
                error: result.as_ref().err(),
            },
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{DependencyStatus, ServiceStatus};
    use std::sync::Mutex;
    use tokio::net::TcpListener;

    #[derive(Default)]
    struct Recording {
        events: Mutex<Vec<(&'static str, &'static str)>>,
    }

    impl RequestObserver for Recording {
        fn on_start(&self, call: &OutboundCall<'_>) {
            self.events.lock().unwrap().push(("start", call.operation.name()));
        }

        fn on_finish(&self, _call: &OutboundCall<'_>, outcome: &CallOutcome<'_>) {
            self.events.lock().unwrap().push(("finish", outcome.label()));
        }
    }

    async fn dead_upstream_config() -> GatewayConfig {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = GatewayConfig::default();
        config.upstream.base_url = format!("http://{}", addr);
        config.timeouts.upstream_request_ms = 500;
        config.timeouts.health_probe_ms = 500;
        config
    }

    #[tokio::test]
    async fn unreachable_upstream_yields_failure_envelope() {
        let gateway = Gateway::from_config(&dead_upstream_config().await).unwrap();

        for method in ProxyMethod::ALL {
            let envelope = gateway.proxy(method, None, None).await;
            assert!(!envelope.is_success());
            assert_eq!(envelope.http_method(), method);
            assert_eq!(envelope.origin_service_id(), "backend");
            assert!(envelope.error_detail().unwrap().contains("unreachable"));
        }
    }

    #[tokio::test]
    async fn unreachable_upstream_is_reported_down() {
        let gateway = Gateway::from_config(&dead_upstream_config().await).unwrap();
        let status = gateway.health(None).await;

        assert_eq!(status.self_status, ServiceStatus::Up);
        assert_eq!(status.dependency_status, DependencyStatus::Down);
        assert_eq!(status.dependency_latency_ms, None);
        assert!(status.dependency_error.is_some());
    }

    #[tokio::test]
    async fn disabled_probe_reports_unknown() {
        let mut config = dead_upstream_config().await;
        config.health_check.probe_upstream = false;
        let recording = Arc::new(Recording::default());
        let gateway = Gateway::with_observer(&config, recording.clone()).unwrap();

        let status = gateway.health(None).await;
        assert_eq!(status.dependency_status, DependencyStatus::Unknown);
        assert!(recording.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn observer_sees_each_call_once_without_changing_it() {
        let config = dead_upstream_config().await;
        let recording = Arc::new(Recording::default());
        let observed = Gateway::with_observer(&config, recording.clone()).unwrap();
        let plain = Gateway::from_config(&config).unwrap();

        let a = observed.proxy(ProxyMethod::Delete, None, Some("req-1")).await;
        let b = plain.proxy(ProxyMethod::Delete, None, Some("req-1")).await;
        assert_eq!(a, b);

        observed.health(None).await;
        assert_eq!(
            *recording.events.lock().unwrap(),
            vec![
                ("start", "proxy-request"),
                ("finish", "unreachable"),
                ("start", "upstream-health-probe"),
                ("finish", "unreachable"),
            ]
        );
    }
}
