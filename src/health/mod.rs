//! Per-service health monitoring behind circuit breakers.
//!
//! Every registered service gets its own [`CircuitBreaker`] and a cached copy
//! of its last health record. Checks run the probe through the breaker and
//! fall back to a synthesized `unknown` record on any failure, so a check for
//! a registered service always produces a value.

mod error;
mod probe;
mod types;


pub use error::*;
pub use probe::*;
pub use types::*;

use crate::circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitBreakerStatus,
};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Error text carried by synthesized records.
pub const FALLBACK_ERROR: &str = "fallback in use";

/// Breaker, probe and cache for one registered service.
struct MonitoredService {
    breaker: CircuitBreaker,
    probe: Arc<dyn HealthProbe>,
    /// Last record returned for this service
    cached: Mutex<ServiceHealth>,
    /// Serializes checks so cache writes never interleave
    in_flight: tokio::sync::Mutex<()>,
}

impl MonitoredService {
    fn cached(&self) -> ServiceHealth {
        self.cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn store(&self, health: ServiceHealth) {
        *self
            .cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = health;
    }

    fn fallback_health(&self, error: &CircuitBreakerError) -> ServiceHealth {
        let cached = self.cached();
        ServiceHealth::unknown(self.breaker.name(), FALLBACK_ERROR).with_metadata(
            ServiceMetadata::Fallback {
                cached_status: cached.status,
                cached_last_check: cached.last_check,
                circuit_breaker_state: self.breaker.state(),
                reason: Some(error.to_string()),
            },
        )
    }
}

/// Registry of monitored services.
pub struct ServiceHealthMonitor {
    services: DashMap<String, Arc<MonitoredService>>,
    /// Breaker config for services registered without one
    default_config: CircuitBreakerConfig,
}

impl Default for ServiceHealthMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceHealthMonitor {
    pub fn new() -> Self {
        Self::with_default_config(CircuitBreakerConfig::default())
    }

    pub fn with_default_config(default_config: CircuitBreakerConfig) -> Self {
        Self {
            services: DashMap::new(),
            default_config,
        }
    }

    /// Register `name` with a fresh breaker and an `unknown` cache entry.
    ///
    /// Registering an existing name replaces its breaker and cache.
    pub fn register_service(
        &self,
        name: impl Into<String>,
        probe: Arc<dyn HealthProbe>,
        config: Option<CircuitBreakerConfig>,
    ) {
        let name = name.into();
        let config = config.unwrap_or(self.default_config);
        let service = Arc::new(MonitoredService {
            breaker: CircuitBreaker::new(name.clone(), config),
            probe,
            cached: Mutex::new(ServiceHealth::new(name.clone(), HealthStatus::Unknown)),
            in_flight: tokio::sync::Mutex::new(()),
        });

        if self.services.insert(name.clone(), service).is_some() {
            tracing::warn!(service = %name, "Service re-registered, circuit breaker replaced");
        } else {
            tracing::debug!(
                service = %name,
                failure_threshold = config.failure_threshold,
                operation_timeout_ms = config.operation_timeout_ms,
                "Service registered"
            );
        }
    }

    /// Check `name` with `probe` through its circuit breaker.
    ///
    /// Fails only with [`HealthError::ServiceNotRegistered`]; every probe
    /// failure, timeout or open circuit yields a fallback record instead.
    pub async fn check_service_health(
        &self,
        name: &str,
        probe: Arc<dyn HealthProbe>,
    ) -> Result<ServiceHealth, HealthError> {
        let service = self.get(name)?;
        let _in_flight = service.in_flight.lock().await;

        let start = Instant::now();
        let mut health = service
            .breaker
            .execute_with_fallback(
                || async move { probe.check().await },
                |error| {
                    tracing::warn!(service = %name, error = %error, "Health check fell back");
                    std::future::ready(service.fallback_health(&error))
                },
            )
            .await;

        // Results are keyed by the registered name
        if health.name != name {
            tracing::debug!(
                service = %name,
                reported = %health.name,
                "Check reported a different name, using the registered one"
            );
            health.name = name.to_string();
        }

        metrics::histogram!("healthguard_probe_duration_seconds",
            "service" => name.to_string()
        )
        .record(start.elapsed().as_secs_f64());

        tracing::debug!(
            service = %name,
            status = %health.status,
            response_time_ms = ?health.response_time_ms,
            "Health check completed"
        );

        service.store(health.clone());
        Ok(health)
    }

    /// Check `name` with the probe it was registered with.
    pub async fn check_registered(&self, name: &str) -> Result<ServiceHealth, HealthError> {
        let probe = Arc::clone(&self.get(name)?.probe);
        self.check_service_health(name, probe).await
    }

    /// Last record produced for `name`, if registered.
    pub fn cached_health(&self, name: &str) -> Option<ServiceHealth> {
        self.services.get(name).map(|entry| entry.cached())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn circuit_breaker_states(&self) -> BTreeMap<String, CircuitBreakerStatus> {
        self.services
            .iter()
            .map(|entry| (entry.key().clone(), entry.breaker.status()))
            .collect()
    }

    pub fn reset_circuit_breaker(&self, name: &str) -> Result<(), HealthError> {
        self.get(name)?.breaker.reset();
        Ok(())
    }

    pub fn reset_all_circuit_breakers(&self) {
        for entry in self.services.iter() {
            entry.breaker.reset();
        }
        tracing::info!(services = self.services.len(), "All circuit breakers reset");
    }

    /// Clone the entry out so no map guard is held across an await.
    fn get(&self, name: &str) -> Result<Arc<MonitoredService>, HealthError> {
        self.services
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| HealthError::ServiceNotRegistered(name.to_string()))
    }
}
