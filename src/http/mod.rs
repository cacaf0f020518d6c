//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → method.rs (restrict to GET/POST/PUT/DELETE)
//!     → gateway (proxy / health)
//!     → response.rs (envelope → 200/503, rejections → 4xx)
//!     → Send to client
//! ```

pub mod method;
pub mod request;
pub mod response;
pub mod server;

pub use method::ProxyMethod;
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::ApiError;
pub use server::GatewayServer;
