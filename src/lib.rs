//! Health-aggregating request-proxy gateway and its upstream echo service.

pub mod client;
pub mod config;
pub mod gateway;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;
pub mod upstream;

pub use config::GatewayConfig;
pub use gateway::{Gateway, ProxyEnvelope};
pub use health::HealthStatus;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
pub use upstream::UpstreamPayload;
