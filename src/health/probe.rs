//! Probe abstraction for dependency health checks.

use super::error::ProbeError;
use super::types::ServiceHealth;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// A health check for one dependency.
///
/// # Cancellation Safety
///
/// The monitor drops a probe's future when it exceeds the breaker's operation
/// timeout. Implementations must tolerate being cancelled at any `.await`.
#[async_trait]
pub trait HealthProbe: Send + Sync + 'static {
    /// Check the dependency once.
    ///
    /// Return `Ok` with `degraded`/`unhealthy` status when the dependency
    /// answered badly; return `Err` only when the probe itself could not run.
    async fn check(&self) -> Result<ServiceHealth, ProbeError>;
}

/// Probe backed by a closure.
pub struct FnProbe<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> HealthProbe for FnProbe<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ServiceHealth, ProbeError>> + Send + 'static,
{
    async fn check(&self) -> Result<ServiceHealth, ProbeError> {
        (self.f)().await
    }
}

/// Wrap a closure returning a future as a shareable probe.
pub fn probe_fn<F, Fut>(f: F) -> Arc<dyn HealthProbe>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ServiceHealth, ProbeError>> + Send + 'static,
{
    Arc::new(FnProbe { f })
}
