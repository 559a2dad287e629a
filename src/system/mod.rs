//! System-wide health aggregation.
//!
//! # Data Flow
//! ```text
//! check_system_health()
//!     → fan out one monitor check per registered service (concurrently)
//!     → each check: circuit breaker → probe, or fallback record
//!     → reduce results to one overall status (critical services decide unhealthy)
//! ```
//!
//! Construct one [`SystemHealthChecker`] at startup and share it behind an
//! `Arc`; construction registers every service with its own circuit breaker.

mod status;


pub use status::*;

use crate::circuit_breaker::{CircuitBreakerConfig, CircuitBreakerStatus};
use crate::health::{HealthError, HealthProbe, ServiceHealth, ServiceHealthMonitor};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Capacity of the snapshot broadcast channel.
const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// A dependency to monitor.
#[derive(Clone)]
pub struct ServiceDefinition {
    pub name: String,
    pub probe: Arc<dyn HealthProbe>,
    /// Unhealthy critical services make the whole system unhealthy
    pub critical: bool,
}

impl ServiceDefinition {
    pub fn new(name: impl Into<String>, probe: Arc<dyn HealthProbe>, critical: bool) -> Self {
        Self {
            name: name.into(),
            probe,
            critical,
        }
    }
}

impl fmt::Debug for ServiceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDefinition")
            .field("name", &self.name)
            .field("critical", &self.critical)
            .finish_non_exhaustive()
    }
}

/// Circuit breaker settings by service criticality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerProfiles {
    pub critical: CircuitBreakerConfig,
    pub standard: CircuitBreakerConfig,
}

impl Default for BreakerProfiles {
    fn default() -> Self {
        Self {
            critical: CircuitBreakerConfig::critical(),
            standard: CircuitBreakerConfig::default(),
        }
    }
}

impl BreakerProfiles {
    pub fn for_service(&self, critical: bool) -> CircuitBreakerConfig {
        if critical {
            self.critical
        } else {
            self.standard
        }
    }
}

/// Aggregates per-service checks into one [`SystemHealth`].
pub struct SystemHealthChecker {
    monitor: ServiceHealthMonitor,
    /// Registration order; fixed after construction
    services: Vec<ServiceDefinition>,
    started_at: Instant,
    version: String,
    updates: broadcast::Sender<SystemHealth>,
}

impl SystemHealthChecker {
    /// Register `definitions` in order, each with the breaker profile for its
    /// criticality. A repeated name replaces the earlier definition in place.
    pub fn new(definitions: Vec<ServiceDefinition>, profiles: BreakerProfiles) -> Self {
        let monitor = ServiceHealthMonitor::with_default_config(profiles.standard);
        let mut services: Vec<ServiceDefinition> = Vec::with_capacity(definitions.len());

        for definition in definitions {
            monitor.register_service(
                definition.name.clone(),
                Arc::clone(&definition.probe),
                Some(profiles.for_service(definition.critical)),
            );

            match services.iter_mut().find(|s| s.name == definition.name) {
                Some(existing) => {
                    tracing::warn!(
                        service = %definition.name,
                        "Duplicate service definition, keeping the last one"
                    );
                    *existing = definition;
                }
                None => services.push(definition),
            }
        }

        tracing::info!(
            services = services.len(),
            critical = services.iter().filter(|s| s.critical).count(),
            "System health checker initialized"
        );

        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            monitor,
            services,
            started_at: Instant::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            updates,
        }
    }

    /// Override the version reported in snapshots.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Check every service concurrently and reduce to one snapshot.
    ///
    /// Results keep registration order. A hung probe delays the snapshot by
    /// at most its breaker's operation timeout.
    pub async fn check_system_health(&self, request_id: Option<String>) -> SystemHealth {
        let start = Instant::now();

        let checks = self.services.iter().map(|definition| async move {
            match self
                .monitor
                .check_service_health(&definition.name, Arc::clone(&definition.probe))
                .await
            {
                Ok(health) => health,
                Err(e) => {
                    tracing::warn!(
                        service = %definition.name,
                        error = %e,
                        "Service check failed unexpectedly"
                    );
                    ServiceHealth::unknown(definition.name.clone(), e.to_string())
                }
            }
        });
        let services = futures::future::join_all(checks).await;

        let overall = aggregate_status(
            services
                .iter()
                .zip(&self.services)
                .map(|(health, definition)| (health, definition.critical)),
        );

        tracing::info!(
            overall = %overall,
            services = services.len(),
            request_id = request_id.as_deref().unwrap_or("-"),
            duration_ms = start.elapsed().as_millis() as u64,
            "System health checked"
        );

        SystemHealth {
            overall,
            services,
            timestamp: Utc::now(),
            uptime_seconds: self.uptime().as_secs(),
            version: self.version.clone(),
            request_id,
        }
    }

    /// Check one service outside the aggregate path.
    pub async fn check_specific_service(&self, name: &str) -> Result<ServiceHealth, HealthError> {
        let definition = self
            .definition(name)
            .ok_or_else(|| HealthError::ServiceNotRegistered(name.to_string()))?;
        self.monitor
            .check_service_health(name, Arc::clone(&definition.probe))
            .await
    }

    pub fn circuit_breaker_states(&self) -> BTreeMap<String, CircuitBreakerStatus> {
        self.monitor.circuit_breaker_states()
    }

    pub fn reset_circuit_breakers(&self) {
        self.monitor.reset_all_circuit_breakers();
    }

    pub fn services(&self) -> &[ServiceDefinition] {
        &self.services
    }

    pub fn is_critical(&self, name: &str) -> bool {
        self.definition(name).is_some_and(|d| d.critical)
    }

    pub fn monitor(&self) -> &ServiceHealthMonitor {
        &self.monitor
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Receive every snapshot produced by the background loop.
    pub fn subscribe(&self) -> broadcast::Receiver<SystemHealth> {
        self.updates.subscribe()
    }

    /// Start periodic system checks in a background task.
    /// Returns a JoinHandle that resolves when the loop stops.
    pub fn start(
        self: Arc<Self>,
        interval: Duration,
        cancel_token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(
                interval_seconds = interval.as_secs(),
                services = self.services.len(),
                "Health monitor started"
            );

            let mut last_overall: Option<OverallStatus> = None;
            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::info!("Health monitor shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        let request_id = crate::logging::generate_request_id();
                        let snapshot = self.check_system_health(Some(request_id)).await;

                        if let Some(previous) = last_overall.filter(|p| *p != snapshot.overall) {
                            tracing::warn!(
                                previous = %previous,
                                current = %snapshot.overall,
                                "Overall health changed"
                            );
                        }
                        last_overall = Some(snapshot.overall);

                        // No receivers is fine
                        let _ = self.updates.send(snapshot);
                    }
                }
            }
        })
    }

    fn definition(&self, name: &str) -> Option<&ServiceDefinition> {
        self.services.iter().find(|d| d.name == name)
    }
}
