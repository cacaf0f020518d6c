//! Instrumentation hook around outbound calls.
//!
//! # Responsibilities
//! - Define the observer interface the gateway calls before/after each
//!   upstream call
//! - Provide a tracing-backed implementation (span events with method and
//!   status attributes)
//!
//! # Design Decisions
//! - Observers return nothing and cannot alter the response
//! - Several strategies can run at once through [`CompositeObserver`]
//! - Attribute names follow OpenTelemetry conventions (`otel.*`, `http.*`)

use axum::http::Uri;
use std::sync::Arc;
use std::time::Duration;

use crate::http::method::ProxyMethod;
use crate::upstream::UpstreamError;

/// Which gateway operation issued the outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ProxyRequest,
    HealthProbe,
}

impl Operation {
    /// Span name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProxyRequest => "proxy-request",
            Self::HealthProbe => "upstream-health-probe",
        }
    }
}

/// Description of an outbound call about to be made.
#[derive(Debug, Clone, Copy)]
pub struct OutboundCall<'a> {
    pub operation: Operation,
    pub method: ProxyMethod,
    pub uri: &'a Uri,
    pub request_id: Option<&'a str>,
}

/// How an outbound call ended.
#[derive(Debug, Clone, Copy)]
pub struct CallOutcome<'a> {
    pub elapsed: Duration,
    pub error: Option<&'a UpstreamError>,
}

impl CallOutcome<'_> {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Short label: "ok" or the error kind.
    pub fn label(&self) -> &'static str {
        self.error.map_or("ok", UpstreamError::kind)
    }
}

/// Side-channel notified around every outbound call.
pub trait RequestObserver: Send + Sync {
    fn on_start(&self, _call: &OutboundCall<'_>) {}

    fn on_finish(&self, call: &OutboundCall<'_>, outcome: &CallOutcome<'_>);
}

/// Observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RequestObserver for NoopObserver {
    fn on_finish(&self, _call: &OutboundCall<'_>, _outcome: &CallOutcome<'_>) {}
}

/// Emits span events into the current tracing span.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RequestObserver for TracingObserver {
    fn on_start(&self, call: &OutboundCall<'_>) {
        tracing::debug!(
            otel.name = call.operation.name(),
            http.method = %call.method,
            url = %call.uri,
            "starting upstream call"
        );
    }

    fn on_finish(&self, call: &OutboundCall<'_>, outcome: &CallOutcome<'_>) {
        let elapsed_ms = outcome.elapsed.as_millis() as u64;
        match outcome.error {
            None => tracing::info!(
                otel.name = call.operation.name(),
                otel.status_code = "OK",
                http.method = %call.method,
                elapsed_ms,
                "upstream call completed"
            ),
            Some(e) => tracing::warn!(
                otel.name = call.operation.name(),
                otel.status_code = "ERROR",
                http.method = %call.method,
                http.status_code = e.status_code(),
                error.kind = e.kind(),
                error = %e,
                elapsed_ms,
                "upstream call failed"
            ),
        }
    }
}

/// Fans each notification out to several observers, in order.
#[derive(Clone, Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn RequestObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl RequestObserver for CompositeObserver {
    fn on_start(&self, call: &OutboundCall<'_>) {
        for observer in &self.observers {
            observer.on_start(call);
        }
    }

    fn on_finish(&self, call: &OutboundCall<'_>, outcome: &CallOutcome<'_>) {
        for observer in &self.observers {
            observer.on_finish(call, outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        starts: AtomicUsize,
        finishes: AtomicUsize,
    }

    impl RequestObserver for Counting {
        fn on_start(&self, _call: &OutboundCall<'_>) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_finish(&self, _call: &OutboundCall<'_>, _outcome: &CallOutcome<'_>) {
            self.finishes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn composite_notifies_every_observer() {
        let a = Arc::new(Counting::default());
        let b = Arc::new(Counting::default());
        let composite = CompositeObserver::new()
            .with(a.clone())
            .with(Arc::new(TracingObserver))
            .with(b.clone());
        assert_eq!(composite.len(), 3);

        let uri: Uri = "http://upstream/echo".parse().unwrap();
        let call = OutboundCall {
            operation: Operation::ProxyRequest,
            method: ProxyMethod::Get,
            uri: &uri,
            request_id: None,
        };
        let err = UpstreamError::BadStatus { status: 500 };
        composite.on_start(&call);
        composite.on_finish(&call, &CallOutcome { elapsed: Duration::ZERO, error: Some(&err) });

        for counter in [&a, &b] {
            assert_eq!(counter.starts.load(Ordering::SeqCst), 1);
            assert_eq!(counter.finishes.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn outcome_labels() {
        let ok = CallOutcome { elapsed: Duration::ZERO, error: None };
        assert!(ok.is_success());
        assert_eq!(ok.label(), "ok");

        let err = UpstreamError::Timeout(Duration::from_secs(5));
        let failed = CallOutcome { elapsed: Duration::ZERO, error: Some(&err) };
        assert_eq!(failed.label(), "timeout");
    }
}
