//! Plain HTTP endpoint probe.

use super::{slow_response_message, status_for_latency};
use crate::health::{HealthProbe, HealthStatus, ProbeError, ServiceHealth, ServiceMetadata};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// `GET url`; the status code and latency decide health.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    name: String,
    url: String,
    degraded_threshold: Duration,
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        degraded_threshold: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            degraded_threshold,
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn check(&self) -> Result<ServiceHealth, ProbeError> {
        let start = Instant::now();
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ProbeError::Request(e.to_string()))?;
        let elapsed = start.elapsed();
        let status = response.status();

        let health = if status.is_success() {
            match status_for_latency(elapsed, self.degraded_threshold) {
                HealthStatus::Degraded => ServiceHealth::degraded(
                    &self.name,
                    slow_response_message(elapsed, self.degraded_threshold),
                ),
                other => ServiceHealth::new(&self.name, other),
            }
        } else if status.is_server_error() {
            ServiceHealth::unhealthy(&self.name, format!("HTTP {}", status.as_u16()))
        } else {
            ServiceHealth::degraded(&self.name, format!("HTTP {}", status.as_u16()))
        };

        tracing::debug!(
            service = %self.name,
            status_code = status.as_u16(),
            latency_ms = elapsed.as_millis() as u64,
            "HTTP probe completed"
        );

        Ok(health
            .with_response_time(elapsed.as_millis() as u64)
            .with_metadata(ServiceMetadata::Http {
                status_code: status.as_u16(),
                indicator: None,
            }))
    }
}
