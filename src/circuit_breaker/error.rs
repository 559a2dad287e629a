//! Error types for circuit-breaker protected calls.

use thiserror::Error;

/// Why a protected call did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitBreakerError {
    /// The wrapped operation returned an error
    #[error("{service}: operation failed: {message}")]
    OperationFailed { service: String, message: String },

    /// The wrapped operation did not settle before its deadline
    #[error("{service}: operation timed out after {timeout_ms}ms")]
    Timeout { service: String, timeout_ms: u64 },

    /// The circuit is open and not yet due for a trial call
    #[error("{service}: circuit breaker is open")]
    CircuitOpen { service: String },
}

impl CircuitBreakerError {
    /// Name of the service whose breaker produced this error.
    pub fn service(&self) -> &str {
        match self {
            Self::OperationFailed { service, .. }
            | Self::Timeout { service, .. }
            | Self::CircuitOpen { service } => service,
        }
    }

    /// Whether the operation was never invoked.
    pub fn is_short_circuit(&self) -> bool {
        matches!(self, Self::CircuitOpen { .. })
    }
}
