//! Configuration for circuit breakers.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Thresholds and deadlines for a single circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the circuit opens
    pub failure_threshold: u32,
    /// How long the circuit stays open before a half-open trial
    pub open_timeout_ms: u64,
    /// Deadline for a single protected call
    pub operation_timeout_ms: u64,
    /// Retry budget for callers; the breaker itself makes one attempt per call
    pub max_retries: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            open_timeout_ms: 60_000,
            operation_timeout_ms: 10_000,
            max_retries: 3,
        }
    }
}

impl CircuitBreakerConfig {
    /// Profile for dependencies whose failure makes the whole system unhealthy.
    ///
    /// Trips after fewer failures and gives up on slow calls sooner than the
    /// default so problems surface quickly.
    pub fn critical() -> Self {
        Self {
            failure_threshold: 3,
            open_timeout_ms: 30_000,
            operation_timeout_ms: 5_000,
            max_retries: 2,
        }
    }

    pub fn open_timeout(&self) -> Duration {
        Duration::from_millis(self.open_timeout_ms)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}
