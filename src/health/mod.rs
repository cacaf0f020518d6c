//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health
//!     → probe.rs (one bounded call to the upstream /health)
//!     → status.rs (selfStatus + dependencyStatus)
//!     → client
//! ```
//!
//! # Design Decisions
//! - Probes run on demand, never in the background
//! - The gateway reports itself UP whenever it can answer at all
//! - A failed probe never fails the health endpoint

pub mod probe;
pub mod status;

pub use status::{DependencyStatus, HealthStatus, ServiceStatus};
