//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway handlers and outbound calls produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tracing.rs (observer hook + span events around upstream calls)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//!     → Any tracing layer installed by the host (e.g. an OpenTelemetry bridge)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through inbound logs and the upstream call
//! - Observers are a side channel: gateway results are identical without them

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::metrics::MetricsObserver;
pub use self::tracing::{
    CallOutcome, CompositeObserver, NoopObserver, Operation, OutboundCall, RequestObserver,
    TracingObserver,
};
