//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (enforce per-operation deadline)
//!     → On failure: report to caller as-is
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Proxy and health probe deadlines are independent
//! - No retries: callers decide whether to try again

pub mod timeouts;
