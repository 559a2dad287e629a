//! Shared test utilities for healthguard integration tests.
//!
//! Provides probe builders and checker setup to reduce duplication across
//! test files.

#![allow(dead_code)]

use healthguard::circuit_breaker::CircuitBreakerConfig;
use healthguard::health::{probe_fn, HealthProbe, ProbeError, ServiceHealth};
use healthguard::system::{BreakerProfiles, ServiceDefinition, SystemHealthChecker};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// UUID v4 string length: "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
pub const UUID_V4_STRING_LEN: usize = 36;

/// Breaker profiles with short timeouts for fast tests.
pub fn fast_profiles() -> BreakerProfiles {
    let fast = CircuitBreakerConfig {
        failure_threshold: 2,
        open_timeout_ms: 200,
        operation_timeout_ms: 100,
        max_retries: 0,
    };
    BreakerProfiles {
        critical: fast,
        standard: CircuitBreakerConfig {
            failure_threshold: 3,
            ..fast
        },
    }
}

pub fn healthy_probe(name: &'static str) -> Arc<dyn HealthProbe> {
    probe_fn(move || async move { Ok(ServiceHealth::healthy(name)) })
}

pub fn degraded_probe(name: &'static str) -> Arc<dyn HealthProbe> {
    probe_fn(move || async move { Ok(ServiceHealth::degraded(name, "slow")) })
}

pub fn unhealthy_probe(name: &'static str) -> Arc<dyn HealthProbe> {
    probe_fn(move || async move { Ok(ServiceHealth::unhealthy(name, "down")) })
}

pub fn failing_probe() -> Arc<dyn HealthProbe> {
    probe_fn(|| async { Err(ProbeError::Request("connection reset".to_string())) })
}

/// Probe that counts calls and fails until `failures` calls have been made.
pub fn flaky_probe(name: &'static str, failures: u32) -> (Arc<dyn HealthProbe>, Arc<AtomicU32>) {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let probe = probe_fn(move || {
        let counter = Arc::clone(&counter);
        async move {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n < failures {
                Err(ProbeError::Connection("refused".to_string()))
            } else {
                Ok(ServiceHealth::healthy(name))
            }
        }
    });
    (probe, calls)
}

/// Probe that never answers within any breaker timeout.
pub fn hanging_probe() -> Arc<dyn HealthProbe> {
    probe_fn(|| async {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(ProbeError::Request("unreachable".to_string()))
    })
}

pub fn checker(definitions: Vec<ServiceDefinition>) -> SystemHealthChecker {
    SystemHealthChecker::new(definitions, fast_profiles())
}
