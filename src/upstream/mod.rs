//! Upstream side of the chain.
//!
//! # Data Flow
//! ```text
//! Gateway
//!     → client.rs (one bounded HTTP call)
//!     → Upstream echo service (echo.rs)
//!     → UpstreamPayload | UpstreamError
//! ```

pub mod client;
pub mod echo;
pub mod error;

pub use client::UpstreamClient;
pub use echo::{UpstreamPayload, DEFAULT_SERVICE_ID};
pub use error::UpstreamError;
