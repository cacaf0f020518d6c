//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by method, status
//! - `gateway_request_duration_seconds` (histogram): inbound latency
//! - `gateway_upstream_calls_total` (counter): outbound calls by operation, outcome
//! - `gateway_upstream_call_duration_seconds` (histogram): outbound latency
//!
//! Without an installed recorder every call here is a no-op.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use crate::observability::tracing::{CallOutcome, OutboundCall, RequestObserver};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished inbound request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a finished outbound call.
pub fn record_upstream_call(operation: &'static str, outcome: &'static str, elapsed: Duration) {
    metrics::counter!(
        "gateway_upstream_calls_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("gateway_upstream_call_duration_seconds", "operation" => operation)
        .record(elapsed.as_secs_f64());
}

/// Observer that feeds outbound calls into the metrics above.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObserver;

impl RequestObserver for MetricsObserver {
    fn on_finish(&self, call: &OutboundCall<'_>, outcome: &CallOutcome<'_>) {
        record_upstream_call(call.operation.name(), outcome.label(), outcome.elapsed);
    }
}
