//! Circuit breaker for calls into unreliable dependencies.
//!
//! Each breaker guards one dependency and owns its own state; breakers never
//! share state with each other.
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure_count >= failure_threshold
//! Open → Half-Open: first call after the open timeout elapses
//! Half-Open → Closed: the trial call succeeds
//! Half-Open → Open: the trial call fails (open timeout restarts)
//! ```
//!
//! Only one trial call runs while half-open; concurrent callers are
//! short-circuited until it settles.

mod config;
mod error;
mod state;


pub use config::*;
pub use error::*;
pub use state::{CircuitBreakerStatus, CircuitState};

use chrono::Utc;
use state::BreakerState;
use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Fault-isolation guard around a single dependency.
pub struct CircuitBreaker {
    /// Service name used in errors, logs and metrics
    name: String,
    config: CircuitBreakerConfig,
    state: Mutex<BreakerState>,
}

impl CircuitBreaker {
    /// Create a closed breaker for `name`.
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            state: Mutex::new(BreakerState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Run `operation` under the breaker without a fallback.
    ///
    /// Returns `CircuitOpen` without invoking the operation when the circuit
    /// is open (or a half-open trial is already running). Otherwise the
    /// operation gets one attempt bounded by `operation_timeout_ms`; a
    /// timed-out operation is dropped and reported as `Timeout`.
    pub async fn execute<T, E, F, Fut>(&self, operation: F) -> Result<T, CircuitBreakerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let Some(permit) = self.try_acquire() else {
            debug!(service = %self.name, "Circuit open, call short-circuited");
            return Err(CircuitBreakerError::CircuitOpen {
                service: self.name.clone(),
            });
        };

        match tokio::time::timeout(self.config.operation_timeout(), operation()).await {
            Ok(Ok(value)) => {
                permit.succeed();
                Ok(value)
            }
            Ok(Err(e)) => {
                let error = CircuitBreakerError::OperationFailed {
                    service: self.name.clone(),
                    message: e.to_string(),
                };
                permit.fail(&error);
                Err(error)
            }
            Err(_) => {
                let error = CircuitBreakerError::Timeout {
                    service: self.name.clone(),
                    timeout_ms: self.config.operation_timeout_ms,
                };
                permit.fail(&error);
                Err(error)
            }
        }
    }

    /// Run `operation` under the breaker, resolving any failure to `fallback`.
    ///
    /// Failures still count toward the threshold; only the error is hidden
    /// from the caller.
    pub async fn execute_with_fallback<T, E, F, Fut, FB, FBFut>(
        &self,
        operation: F,
        fallback: FB,
    ) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
        FB: FnOnce(CircuitBreakerError) -> FBFut,
        FBFut: Future<Output = T>,
    {
        match self.execute(operation).await {
            Ok(value) => value,
            Err(error) => {
                debug!(service = %self.name, error = %error, "Using fallback");
                fallback(error).await
            }
        }
    }

    /// Snapshot of the current state.
    pub fn status(&self) -> CircuitBreakerStatus {
        self.lock().snapshot()
    }

    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    /// Force the breaker closed with a zero failure count.
    ///
    /// Calls still in flight from before the reset do not record their outcome.
    pub fn reset(&self) {
        let mut state = self.lock();
        let previous = state.state;
        state.state = CircuitState::Closed;
        state.failure_count = 0;
        state.last_success_time = Some(Utc::now());
        state.next_attempt_at = None;
        state.trial_in_flight = false;
        state.generation = state.generation.wrapping_add(1);
        drop(state);

        if previous != CircuitState::Closed {
            self.record_transition(CircuitState::Closed);
        }
        info!(service = %self.name, previous = %previous, "Circuit breaker reset");
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn try_acquire(&self) -> Option<CallPermit<'_>> {
        let mut state = self.lock();
        let trial = match state.state {
            CircuitState::Closed => false,
            CircuitState::Open => {
                let due = state
                    .next_attempt_at
                    .map_or(true, |at| Instant::now() >= at);
                if !due {
                    return None;
                }
                state.state = CircuitState::HalfOpen;
                state.trial_in_flight = true;
                info!(service = %self.name, "Circuit breaker half-open, admitting trial call");
                self.record_transition(CircuitState::HalfOpen);
                true
            }
            CircuitState::HalfOpen => {
                if state.trial_in_flight {
                    return None;
                }
                state.trial_in_flight = true;
                true
            }
        };

        Some(CallPermit {
            breaker: self,
            generation: state.generation,
            trial,
            settled: false,
        })
    }

    fn on_success(&self, generation: u64, trial: bool) {
        let mut state = self.lock();
        if state.generation != generation {
            debug!(service = %self.name, "Discarding outcome from before reset");
            return;
        }
        state.last_success_time = Some(Utc::now());

        if trial {
            state.trial_in_flight = false;
            if state.state == CircuitState::HalfOpen {
                state.state = CircuitState::Closed;
                state.failure_count = 0;
                state.next_attempt_at = None;
                info!(service = %self.name, "Trial call succeeded, circuit closed");
                self.record_transition(CircuitState::Closed);
            }
        } else if state.state == CircuitState::Closed {
            state.failure_count = 0;
        }
    }

    fn on_failure(&self, generation: u64, trial: bool, error: &CircuitBreakerError) {
        let mut state = self.lock();
        if state.generation != generation {
            debug!(service = %self.name, "Discarding outcome from before reset");
            return;
        }
        state.last_failure_time = Some(Utc::now());

        if trial {
            state.trial_in_flight = false;
            state.failure_count = state.failure_count.saturating_add(1);
            if state.state == CircuitState::HalfOpen {
                self.open(&mut state);
                warn!(
                    service = %self.name,
                    error = %error,
                    "Trial call failed, circuit re-opened"
                );
            }
        } else if state.state == CircuitState::Closed {
            state.failure_count = state.failure_count.saturating_add(1);
            if state.failure_count >= self.config.failure_threshold.max(1) {
                self.open(&mut state);
                warn!(
                    service = %self.name,
                    failures = state.failure_count,
                    error = %error,
                    "Failure threshold reached, circuit opened"
                );
            }
        }
    }

    fn on_abandoned_trial(&self, generation: u64) {
        let mut state = self.lock();
        if state.generation != generation {
            return;
        }
        if state.state == CircuitState::HalfOpen && state.trial_in_flight {
            state.trial_in_flight = false;
            state.state = CircuitState::Open;
            // Let the next caller probe straight away.
            state.next_attempt_at = Some(Instant::now());
            debug!(service = %self.name, "Trial call dropped before settling");
            self.record_transition(CircuitState::Open);
        }
    }

    fn open(&self, state: &mut BreakerState) {
        state.state = CircuitState::Open;
        state.next_attempt_at = Some(Instant::now() + self.config.open_timeout());
        self.record_transition(CircuitState::Open);
    }

    fn record_transition(&self, to: CircuitState) {
        metrics::counter!("healthguard_circuit_transitions_total",
            "service" => self.name.clone(),
            "to" => to.to_string()
        )
        .increment(1);
    }
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("status", &self.status())
            .finish()
    }
}

/// Admission ticket for one call; records its outcome exactly once.
struct CallPermit<'a> {
    breaker: &'a CircuitBreaker,
    generation: u64,
    trial: bool,
    settled: bool,
}

impl CallPermit<'_> {
    fn succeed(mut self) {
        self.settled = true;
        self.breaker.on_success(self.generation, self.trial);
    }

    fn fail(mut self, error: &CircuitBreakerError) {
        self.settled = true;
        self.breaker.on_failure(self.generation, self.trial, error);
    }
}

impl Drop for CallPermit<'_> {
    fn drop(&mut self) {
        if !self.settled && self.trial {
            self.breaker.on_abandoned_trial(self.generation);
        }
    }
}
