//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the upstream URL is something the outbound client can reach
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.service.id.trim().is_empty() {
        errors.push(ValidationError::new("service.id", "must not be empty"));
    }

    validate_upstream_url(&config.upstream.base_url, &mut errors);

    for (field, path) in [
        ("upstream.echo_path", &config.upstream.echo_path),
        ("upstream.health_path", &config.upstream.health_path),
    ] {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(field, format!("'{}' must start with '/'", path)));
        }
    }

    let timeouts = &config.timeouts;
    if timeouts.upstream_request_ms == 0 {
        errors.push(ValidationError::new("timeouts.upstream_request_ms", "must be greater than 0"));
    }
    if timeouts.health_probe_ms == 0 {
        errors.push(ValidationError::new("timeouts.health_probe_ms", "must be greater than 0"));
    }
    // The handler backstop must never fire before an outbound call reports.
    if timeouts.handler() <= timeouts.upstream_request() || timeouts.handler() <= timeouts.health_probe() {
        errors.push(ValidationError::new(
            "timeouts.handler_secs",
            "must exceed both upstream_request_ms and health_probe_ms",
        ));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_upstream_url(raw: &str, errors: &mut Vec<ValidationError>) {
    if raw.trim().is_empty() {
        errors.push(ValidationError::new("upstream.base_url", "is required"));
        return;
    }
    match Url::parse(raw) {
        Ok(url) => {
            if url.scheme() != "http" {
                errors.push(ValidationError::new(
                    "upstream.base_url",
                    format!("scheme '{}' is not supported, use http", url.scheme()),
                ));
            }
            if url.host_str().is_none() {
                errors.push(ValidationError::new("upstream.base_url", "must include a host"));
            }
        }
        Err(e) => errors.push(ValidationError::new("upstream.base_url", format!("invalid URL: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.upstream.base_url = "http://127.0.0.1:8081".into();
        config
    }

    #[test]
    fn accepts_defaults_with_upstream() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn base_url_is_required() {
        let errors = validate_config(&GatewayConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "upstream.base_url");
    }

    #[test]
    fn rejects_https_upstream() {
        let mut config = valid();
        config.upstream.base_url = "https://upstream.example".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].message.contains("https"));
    }

    #[test]
    fn collects_every_error() {
        let mut config = valid();
        config.listener.bind_address = "nope".into();
        config.upstream.echo_path = "echo".into();
        config.timeouts.upstream_request_ms = 0;
        config.service.id = " ".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"listener.bind_address"));
        assert!(fields.contains(&"upstream.echo_path"));
        assert!(fields.contains(&"timeouts.upstream_request_ms"));
        assert!(fields.contains(&"service.id"));
    }

    #[test]
    fn handler_timeout_must_outlast_outbound_calls() {
        let mut config = valid();
        config.timeouts.handler_secs = 5;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "timeouts.handler_secs");
    }
}
