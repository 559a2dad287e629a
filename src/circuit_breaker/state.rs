//! Circuit breaker state and diagnostic snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::time::Instant;

/// Position of a breaker in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CircuitState {
    /// Calls pass through
    #[default]
    Closed,
    /// Calls are short-circuited until the open timeout elapses
    Open,
    /// One trial call is allowed to test recovery
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open => write!(f, "open"),
            CircuitState::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Read-only snapshot of a breaker, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitBreakerStatus {
    pub state: CircuitState,
    pub failure_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_failure_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_success_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_attempt_time: Option<DateTime<Utc>>,
}

/// Mutable state owned by exactly one breaker.
#[derive(Debug, Default)]
pub(super) struct BreakerState {
    pub state: CircuitState,
    pub failure_count: u32,
    pub last_failure_time: Option<DateTime<Utc>>,
    pub last_success_time: Option<DateTime<Utc>>,
    /// Monotonic deadline after which an open circuit admits a trial
    pub next_attempt_at: Option<Instant>,
    /// Set while the half-open trial call is running
    pub trial_in_flight: bool,
    /// Bumped by reset; outcomes from older generations are discarded
    pub generation: u64,
}

impl BreakerState {
    pub fn snapshot(&self) -> CircuitBreakerStatus {
        let next_attempt_time = self.next_attempt_at.map(|at| {
            let remaining = chrono::Duration::from_std(at.saturating_duration_since(Instant::now()))
                .unwrap_or_else(|_| chrono::Duration::zero());
            Utc::now() + remaining
        });

        CircuitBreakerStatus {
            state: self.state,
            failure_count: self.failure_count,
            last_failure_time: self.last_failure_time,
            last_success_time: self.last_success_time,
            next_attempt_time,
        }
    }
}
