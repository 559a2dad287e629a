//! Probe for Statuspage-style `status.json` documents.
//!
//! Many SaaS providers publish their own health as:
//!
//! ```json
//! {"status": {"indicator": "minor", "description": "Partially Degraded Service"}}
//! ```

use crate::health::{HealthProbe, HealthStatus, ProbeError, ServiceHealth, ServiceMetadata};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Instant;

#[derive(Debug, Deserialize)]
struct StatusDocument {
    status: StatusIndicator,
}

#[derive(Debug, Deserialize)]
struct StatusIndicator {
    indicator: String,
    #[serde(default)]
    description: Option<String>,
}

/// Reads a provider's published status instead of probing it directly.
#[derive(Debug, Clone)]
pub struct StatusPageProbe {
    name: String,
    url: String,
    provider: String,
    client: reqwest::Client,
}

impl StatusPageProbe {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        provider: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            provider: provider.into(),
            client,
        }
    }
}

/// Map a provider indicator to a status. Unrecognised indicators are degraded.
pub(crate) fn indicator_status(indicator: &str) -> HealthStatus {
    match indicator {
        "none" => HealthStatus::Healthy,
        "minor" => HealthStatus::Degraded,
        "major" | "critical" => HealthStatus::Unhealthy,
        _ => HealthStatus::Degraded,
    }
}

#[async_trait]
impl HealthProbe for StatusPageProbe {
    async fn check(&self) -> Result<ServiceHealth, ProbeError> {
        let start = Instant::now();
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ProbeError::Request(e.to_string()))?;
        let status_code = response.status();

        if !status_code.is_success() {
            let elapsed = start.elapsed();
            return Ok(ServiceHealth::degraded(
                &self.name,
                format!(
                    "{} status page returned HTTP {}",
                    self.provider,
                    status_code.as_u16()
                ),
            )
            .with_response_time(elapsed.as_millis() as u64)
            .with_metadata(ServiceMetadata::Http {
                status_code: status_code.as_u16(),
                indicator: None,
            }));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProbeError::Request(e.to_string()))?;
        let elapsed = start.elapsed();

        let document: StatusDocument = serde_json::from_str(&body)
            .map_err(|e| ProbeError::InvalidResponse(e.to_string()))?;
        let indicator = document.status.indicator;

        let health = match indicator_status(&indicator) {
            HealthStatus::Healthy => ServiceHealth::healthy(&self.name),
            status => ServiceHealth::new(&self.name, status)
                .with_error(format!("{} status: {}", self.provider, indicator)),
        };

        tracing::debug!(
            service = %self.name,
            indicator = %indicator,
            description = document.status.description.as_deref().unwrap_or(""),
            "Status page probe completed"
        );

        Ok(health
            .with_response_time(elapsed.as_millis() as u64)
            .with_metadata(ServiceMetadata::Http {
                status_code: status_code.as_u16(),
                indicator: Some(indicator),
            }))
    }
}
