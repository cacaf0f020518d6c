//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (CORS preflight / response headers)
//!     → limits.rs (cap request body size)
//!     → Pass to handlers
//! ```
//!
//! # Design Decisions
//! - Limits are enforced before the body reaches a handler
//! - Oversized bodies never trigger an upstream call

pub mod headers;
pub mod limits;
