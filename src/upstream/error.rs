//! Failures of a single outbound call to the upstream service.

use std::time::Duration;
use thiserror::Error;

/// Why an upstream call did not produce a usable answer.
///
/// The `Display` text is what callers see in `errorDetail` and
/// `dependencyError`, so it names the cause plainly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// Connection refused, DNS failure, or the socket died mid-exchange.
    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    #[error("upstream did not respond within {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Reachable, but answered with a non-2xx status.
    #[error("upstream responded with HTTP {status}")]
    BadStatus { status: u16 },

    /// Reachable and 2xx, but the body was not the expected JSON.
    #[error("upstream response could not be parsed: {0}")]
    Malformed(String),

    #[error("could not build upstream request: {0}")]
    InvalidRequest(String),
}

impl UpstreamError {
    /// Stable label for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "unreachable",
            Self::Timeout(_) => "timeout",
            Self::BadStatus { .. } => "bad_status",
            Self::Malformed(_) => "malformed",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// HTTP status the upstream answered with, if it answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::BadStatus { status } => Some(*status),
            _ => None,
        }
    }
}

/// Render an error with its whole source chain; hyper's top-level
/// messages ("client error (Connect)") hide the useful part.
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // Some errors already print their source in their own message.
        if !out.ends_with(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_the_bound() {
        let err = UpstreamError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "upstream did not respond within 1500ms");
        assert!(err.is_timeout());
    }

    #[test]
    fn bad_status_message_names_the_status() {
        let err = UpstreamError::BadStatus { status: 502 };
        assert_eq!(err.status_code(), Some(502));
        assert_eq!(err.to_string(), "upstream responded with HTTP 502");
        assert_eq!(err.kind(), "bad_status");
    }

    #[derive(Debug, Error)]
    #[error("client error (Connect)")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn error_chain_includes_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        assert_eq!(error_chain(&Outer(io)), "client error (Connect): connection refused");
    }

    #[derive(Debug, Error)]
    #[error("length limit exceeded")]
    struct Wrapper(#[source] Inner);

    #[derive(Debug, Error)]
    #[error("length limit exceeded")]
    struct Inner;

    #[test]
    fn error_chain_skips_repeated_messages() {
        assert_eq!(error_chain(&Wrapper(Inner)), "length limit exceeded");
    }
}
