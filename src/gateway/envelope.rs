//! The response wrapper the gateway returns from the proxy operation.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::http::method::ProxyMethod;
use crate::upstream::UpstreamPayload;

/// Proxy result tagged with the gateway's identity.
///
/// Exactly one of `upstreamResult` and `errorDetail` is non-null; the
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyEnvelope {
    origin_service_id: String,
    http_method: ProxyMethod,
    upstream_result: Option<UpstreamPayload>,
    error_detail: Option<String>,
}

impl ProxyEnvelope {
    pub fn success(origin: &str, method: ProxyMethod, payload: UpstreamPayload) -> Self {
        Self {
            origin_service_id: origin.to_string(),
            http_method: method,
            upstream_result: Some(payload),
            error_detail: None,
        }
    }

    pub fn failure(origin: &str, method: ProxyMethod, detail: impl Into<String>) -> Self {
        Self {
            origin_service_id: origin.to_string(),
            http_method: method,
            upstream_result: None,
            error_detail: Some(detail.into()),
        }
    }

    pub fn origin_service_id(&self) -> &str {
        &self.origin_service_id
    }

    pub fn http_method(&self) -> ProxyMethod {
        self.http_method
    }

    pub fn upstream_result(&self) -> Option<&UpstreamPayload> {
        self.upstream_result.as_ref()
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.upstream_result.is_some()
    }

    /// 200 for a wrapped upstream result, 503 for a reported failure.
    pub fn status_code(&self) -> StatusCode {
        if self.is_success() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
