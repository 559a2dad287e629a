//! Built-in probes declared in configuration.
//!
//! Each [`ProbeConfig`] variant maps to one [`HealthProbe`] implementation.
//! HTTP-based probes share a single `reqwest::Client` for connection pooling.

mod http;
mod status_page;
mod tcp;

pub use http::HttpProbe;
pub use status_page::StatusPageProbe;
pub use tcp::TcpProbe;

use crate::config::{HealthguardConfig, ProbeConfig};
use crate::health::{HealthProbe, HealthStatus, ProbeError};
use crate::system::ServiceDefinition;
use std::sync::Arc;
use std::time::Duration;

/// Per-request timeout for the shared HTTP client.
///
/// The breaker's operation timeout normally fires first; this bounds the
/// client when probes are used outside a breaker.
const HTTP_CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the HTTP client shared by HTTP and status-page probes.
pub fn build_client() -> Result<reqwest::Client, ProbeError> {
    reqwest::Client::builder()
        .timeout(HTTP_CLIENT_TIMEOUT)
        .user_agent(concat!("healthguard/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProbeError::Client(e.to_string()))
}

/// Create the probe described by `config` for the service `name`.
pub fn build_probe(
    name: &str,
    config: &ProbeConfig,
    client: &reqwest::Client,
) -> Arc<dyn HealthProbe> {
    match config {
        ProbeConfig::Http {
            url,
            degraded_threshold_ms,
        } => Arc::new(HttpProbe::new(
            name,
            url.clone(),
            Duration::from_millis(*degraded_threshold_ms),
            client.clone(),
        )),
        ProbeConfig::StatusPage { url, provider } => Arc::new(StatusPageProbe::new(
            name,
            url.clone(),
            provider.clone().unwrap_or_else(|| name.to_string()),
            client.clone(),
        )),
        ProbeConfig::Tcp {
            address,
            degraded_threshold_ms,
        } => Arc::new(TcpProbe::new(
            name,
            address.clone(),
            Duration::from_millis(*degraded_threshold_ms),
        )),
    }
}

/// Turn every configured service into a [`ServiceDefinition`], in file order.
pub fn build_definitions(
    config: &HealthguardConfig,
) -> Result<Vec<ServiceDefinition>, ProbeError> {
    let client = build_client()?;

    Ok(config
        .services
        .iter()
        .map(|service| {
            ServiceDefinition::new(
                service.name.clone(),
                build_probe(&service.name, &service.probe, &client),
                service.critical,
            )
        })
        .collect())
}

/// Healthy, or degraded when the dependency answered slower than `threshold`.
fn status_for_latency(elapsed: Duration, threshold: Duration) -> HealthStatus {
    if elapsed > threshold {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}

fn slow_response_message(elapsed: Duration, threshold: Duration) -> String {
    format!(
        "slow response: {}ms (threshold {}ms)",
        elapsed.as_millis(),
        threshold.as_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    #[test]
    fn test_status_for_latency() {
        let threshold = Duration::from_millis(100);
        assert_eq!(
            status_for_latency(Duration::from_millis(100), threshold),
            HealthStatus::Healthy
        );
        assert_eq!(
            status_for_latency(Duration::from_millis(101), threshold),
            HealthStatus::Degraded
        );
    }

    #[test]
    fn test_build_definitions_keeps_order_and_criticality() {
        let mut config = HealthguardConfig::default();
        config.services = vec![
            ServiceConfig {
                name: "database".to_string(),
                critical: true,
                probe: ProbeConfig::Tcp {
                    address: "localhost:5432".to_string(),
                    degraded_threshold_ms: 1_000,
                },
            },
            ServiceConfig {
                name: "email-service".to_string(),
                critical: false,
                probe: ProbeConfig::StatusPage {
                    url: "https://status.example.com/api/v2/status.json".to_string(),
                    provider: None,
                },
            },
        ];

        let definitions = build_definitions(&config).unwrap();
        let summary: Vec<_> = definitions
            .iter()
            .map(|d| (d.name.as_str(), d.critical))
            .collect();
        assert_eq!(summary, vec![("database", true), ("email-service", false)]);
    }

    #[test]
    fn test_build_definitions_empty() {
        let definitions = build_definitions(&HealthguardConfig::default()).unwrap();
        assert!(definitions.is_empty());
    }
}
