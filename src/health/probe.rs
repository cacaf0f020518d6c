//! On-demand upstream health probe.
//!
//! # Responsibilities
//! - Time a single probe call
//! - Turn its outcome into a [`HealthStatus`]

use std::future::Future;
use std::time::Instant;

use crate::health::status::HealthStatus;
use crate::upstream::UpstreamError;

/// Await `probe` and report the dependency as UP (with latency) or DOWN.
///
/// The probe future carries its own deadline; this only measures it.
pub async fn measure<F>(probe: F) -> HealthStatus
where
    F: Future<Output = Result<(), UpstreamError>>,
{
    let started = Instant::now();
    match probe.await {
        Ok(()) => {
            let latency = started.elapsed();
            tracing::debug!(latency_ms = latency.as_millis() as u64, "Upstream health check passed");
            HealthStatus::dependency_up(latency)
        }
        Err(e) => {
            tracing::warn!(kind = e.kind(), error = %e, "Upstream health check failed");
            HealthStatus::dependency_down(&e)
        }
    }
}
