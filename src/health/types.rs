//! Health records produced by probes and the monitor.

use crate::circuit_breaker::CircuitState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Health of a single dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
    /// No live result is available (never checked, or a fallback was used)
    Unknown,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Degraded => write!(f, "degraded"),
            HealthStatus::Unhealthy => write!(f, "unhealthy"),
            HealthStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Diagnostic payload attached to a health record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServiceMetadata {
    /// Result of an HTTP request
    Http {
        status_code: u16,
        /// Provider-reported indicator for status-page probes
        #[serde(default, skip_serializing_if = "Option::is_none")]
        indicator: Option<String>,
    },
    /// Result of a socket connect
    Tcp { address: String },
    /// Synthesized record used in place of a live result
    Fallback {
        cached_status: HealthStatus,
        cached_last_check: DateTime<Utc>,
        circuit_breaker_state: CircuitState,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Free-form diagnostics
    Details {
        fields: BTreeMap<String, serde_json::Value>,
    },
}

/// One health check result for a named dependency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    pub last_check: DateTime<Utc>,
    /// Human-readable failure reason; must not contain secrets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ServiceMetadata>,
}

impl ServiceHealth {
    /// Record with the given status, checked now.
    pub fn new(name: impl Into<String>, status: HealthStatus) -> Self {
        Self {
            name: name.into(),
            status,
            response_time_ms: None,
            last_check: Utc::now(),
            error: None,
            metadata: None,
        }
    }

    pub fn healthy(name: impl Into<String>) -> Self {
        Self::new(name, HealthStatus::Healthy)
    }

    pub fn degraded(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(name, HealthStatus::Degraded).with_error(error)
    }

    pub fn unhealthy(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(name, HealthStatus::Unhealthy).with_error(error)
    }

    pub fn unknown(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(name, HealthStatus::Unknown).with_error(error)
    }

    pub fn with_response_time(mut self, response_time_ms: u64) -> Self {
        self.response_time_ms = Some(response_time_ms);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_metadata(mut self, metadata: ServiceMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Whether this record was synthesized instead of returned by a probe.
    pub fn is_fallback(&self) -> bool {
        matches!(self.metadata, Some(ServiceMetadata::Fallback { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Degraded).unwrap(),
            "\"degraded\""
        );
        let parsed: HealthStatus = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(parsed, HealthStatus::Unknown);
    }

    #[test]
    fn test_service_health_camel_case_fields() {
        let health = ServiceHealth::healthy("database")
            .with_response_time(42)
            .with_metadata(ServiceMetadata::Tcp {
                address: "db:5432".to_string(),
            });
        let json = serde_json::to_value(&health).unwrap();

        assert_eq!(json["name"], "database");
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["responseTimeMs"], 42);
        assert!(json.get("lastCheck").is_some());
        assert!(json.get("error").is_none());
        assert_eq!(json["metadata"]["kind"], "tcp");
        assert_eq!(json["metadata"]["address"], "db:5432");
    }

    #[test]
    fn test_fallback_metadata_shape() {
        let metadata = ServiceMetadata::Fallback {
            cached_status: HealthStatus::Healthy,
            cached_last_check: Utc::now(),
            circuit_breaker_state: CircuitState::Open,
            reason: None,
        };
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["kind"], "fallback");
        assert_eq!(json["cachedStatus"], "healthy");
        assert_eq!(json["circuitBreakerState"], "open");
        assert!(json.get("cachedLastCheck").is_some());
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn test_http_metadata_roundtrip() {
        let json = r#"{"kind":"http","statusCode":503}"#;
        let metadata: ServiceMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(
            metadata,
            ServiceMetadata::Http {
                status_code: 503,
                indicator: None
            }
        );
    }

    #[test]
    fn test_constructors_set_error() {
        let health = ServiceHealth::degraded("email-service", "SendGrid status: minor");
        assert_eq!(health.status, HealthStatus::Degraded);
        assert_eq!(health.error.as_deref(), Some("SendGrid status: minor"));
        assert!(!health.is_fallback());
    }
}
