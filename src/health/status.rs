//! Aggregate health answer of the gateway.
//!
//! # States
//! - selfStatus: always UP while the handler runs
//! - dependencyStatus: UP / DOWN from a live probe, UNKNOWN when probing is off
//!
//! # Design Decisions
//! - Recomputed on every request, never cached
//! - Latency present only when the dependency is UP; error only when DOWN

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::upstream::UpstreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceStatus {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DependencyStatus {
    Up,
    Down,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub self_status: ServiceStatus,
    pub dependency_status: DependencyStatus,
    pub dependency_latency_ms: Option<u64>,
    pub dependency_error: Option<String>,
}

impl HealthStatus {
    pub fn dependency_up(latency: Duration) -> Self {
        Self {
            self_status: ServiceStatus::Up,
            dependency_status: DependencyStatus::Up,
            dependency_latency_ms: Some(u64::try_from(latency.as_millis()).unwrap_or(u64::MAX)),
            dependency_error: None,
        }
    }

    pub fn dependency_down(error: &UpstreamError) -> Self {
        Self {
            self_status: ServiceStatus::Up,
            dependency_status: DependencyStatus::Down,
            dependency_latency_ms: None,
            dependency_error: Some(error.to_string()),
        }
    }

    /// Probing disabled: nothing is known about the dependency.
    pub fn dependency_unknown() -> Self {
        Self {
            self_status: ServiceStatus::Up,
            dependency_status: DependencyStatus::Unknown,
            dependency_latency_ms: None,
            dependency_error: None,
        }
    }
}
