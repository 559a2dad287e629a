//! Error types for health monitoring.

use thiserror::Error;

/// Errors surfaced by the monitor to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HealthError {
    /// No service with this name was registered
    #[error("service not registered: {0}")]
    ServiceNotRegistered(String),
}

/// Errors raised by a probe that could not run at all.
///
/// A dependency that is merely slow or failing is reported through the
/// returned `ServiceHealth`, not through this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// Request could not be sent
    #[error("request failed: {0}")]
    Request(String),

    /// Connection could not be attempted
    #[error("connection failed: {0}")]
    Connection(String),

    /// Response could not be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_registered_display() {
        let err = HealthError::ServiceNotRegistered("ghost".to_string());
        assert_eq!(err.to_string(), "service not registered: ghost");
    }

    #[test]
    fn test_probe_error_display() {
        assert_eq!(
            ProbeError::Request("dns error".to_string()).to_string(),
            "request failed: dns error"
        );
        assert_eq!(
            ProbeError::InvalidResponse("expected JSON".to_string()).to_string(),
            "invalid response: expected JSON"
        );
    }
}
