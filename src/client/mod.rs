//! Client for driving a running gateway, used by `gateway-cli`.

pub mod history;

use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::gateway::ProxyEnvelope;
use crate::health::HealthStatus;
use crate::http::method::ProxyMethod;

pub use history::{RequestHistory, RequestHistoryEntry, HISTORY_CAPACITY};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with something other than an envelope / health body.
    #[error("unexpected response (HTTP {status}): {body}")]
    Unexpected { status: u16, body: String },
}

/// Result of one proxied request, as seen by the caller.
#[derive(Debug, Clone)]
pub struct ProxyReply {
    pub status: u16,
    pub envelope: ProxyEnvelope,
    pub round_trip: Duration,
}

impl ProxyReply {
    pub fn history_entry(&self) -> RequestHistoryEntry {
        RequestHistoryEntry::new(self.envelope.http_method(), self.status, self.round_trip)
    }
}

pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send one request to `/proxy`. 503 envelopes are returned, not errors.
    pub async fn send(&self, method: ProxyMethod, payload: Option<&Value>) -> Result<ProxyReply, ClientError> {
        let mut request = self
            .client
            .request(method.to_http(), format!("{}/proxy", self.base_url));
        if let Some(payload) = payload.filter(|_| method.carries_body()) {
            request = request.json(payload);
        }

        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let round_trip = started.elapsed();

        let envelope = serde_json::from_str(&text)
            .map_err(|_| ClientError::Unexpected { status, body: text })?;
        Ok(ProxyReply { status, envelope, round_trip })
    }

    /// Fetch the aggregate health of the gateway.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.client.get(format!("{}/health", self.base_url)).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|_| ClientError::Unexpected { status, body: text })
    }
}
