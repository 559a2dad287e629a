//! Socket connect probe for databases, caches and other TCP services.

use super::{slow_response_message, status_for_latency};
use crate::health::{HealthProbe, HealthStatus, ProbeError, ServiceHealth, ServiceMetadata};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;

/// Opens (and immediately closes) a TCP connection to `address`.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    name: String,
    address: String,
    degraded_threshold: Duration,
}

impl TcpProbe {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        degraded_threshold: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            degraded_threshold,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl HealthProbe for TcpProbe {
    async fn check(&self) -> Result<ServiceHealth, ProbeError> {
        let start = Instant::now();
        let result = TcpStream::connect(&self.address).await;
        let elapsed = start.elapsed();
        let metadata = ServiceMetadata::Tcp {
            address: self.address.clone(),
        };

        let health = match result {
            Ok(_stream) => match status_for_latency(elapsed, self.degraded_threshold) {
                HealthStatus::Degraded => ServiceHealth::degraded(
                    &self.name,
                    slow_response_message(elapsed, self.degraded_threshold),
                ),
                other => ServiceHealth::new(&self.name, other),
            },
            Err(e) if e.kind() == ErrorKind::ConnectionRefused => ServiceHealth::unhealthy(
                &self.name,
                format!("connection refused by {}", self.address),
            ),
            Err(e) => {
                return Err(ProbeError::Connection(format!("{}: {}", self.address, e)));
            }
        };

        tracing::debug!(
            service = %self.name,
            address = %self.address,
            status = %health.status,
            latency_ms = elapsed.as_millis() as u64,
            "TCP probe completed"
        );

        Ok(health
            .with_response_time(elapsed.as_millis() as u64)
            .with_metadata(metadata))
    }
}
