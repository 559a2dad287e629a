//! Aggregate health snapshot and status reduction.

use crate::health::{HealthStatus, ServiceHealth};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of the system as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallStatus::Healthy => write!(f, "healthy"),
            OverallStatus::Degraded => write!(f, "degraded"),
            OverallStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// One aggregation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemHealth {
    pub overall: OverallStatus,
    /// Per-service results in registration order
    pub services: Vec<ServiceHealth>,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl SystemHealth {
    pub fn service(&self, name: &str) -> Option<&ServiceHealth> {
        self.services.iter().find(|s| s.name == name)
    }
}

/// Reduce `(result, is_critical)` pairs to one overall status.
///
/// A critical service that is unhealthy makes the system unhealthy. Any other
/// unhealthy or degraded service makes it degraded. `unknown` results do not
/// affect the outcome.
pub fn aggregate_status<'a, I>(results: I) -> OverallStatus
where
    I: IntoIterator<Item = (&'a ServiceHealth, bool)>,
{
    let mut overall = OverallStatus::Healthy;
    for (health, critical) in results {
        match health.status {
            HealthStatus::Unhealthy if critical => return OverallStatus::Unhealthy,
            HealthStatus::Unhealthy | HealthStatus::Degraded => {
                overall = OverallStatus::Degraded;
            }
            HealthStatus::Healthy | HealthStatus::Unknown => {}
        }
    }
    overall
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_status(name: &str, status: HealthStatus) -> ServiceHealth {
        ServiceHealth::new(name, status)
    }

    #[test]
    fn test_all_healthy() {
        let db = with_status("database", HealthStatus::Healthy);
        let email = with_status("email-service", HealthStatus::Healthy);
        assert_eq!(
            aggregate_status([(&db, true), (&email, false)]),
            OverallStatus::Healthy
        );
    }

    #[test]
    fn test_non_critical_degraded() {
        let db = with_status("database", HealthStatus::Healthy);
        let email = with_status("email-service", HealthStatus::Degraded);
        assert_eq!(
            aggregate_status([(&db, true), (&email, false)]),
            OverallStatus::Degraded
        );
    }

    #[test]
    fn test_critical_unhealthy() {
        let db = with_status("database", HealthStatus::Unhealthy);
        let email = with_status("email-service", HealthStatus::Healthy);
        assert_eq!(
            aggregate_status([(&db, true), (&email, false)]),
            OverallStatus::Unhealthy
        );
    }

    #[test]
    fn test_non_critical_unhealthy_only_degrades() {
        let db = with_status("database", HealthStatus::Healthy);
        let analytics = with_status("analytics", HealthStatus::Unhealthy);
        assert_eq!(
            aggregate_status([(&db, true), (&analytics, false)]),
            OverallStatus::Degraded
        );
    }

    #[test]
    fn test_critical_degraded_only_degrades() {
        let db = with_status("database", HealthStatus::Degraded);
        assert_eq!(aggregate_status([(&db, true)]), OverallStatus::Degraded);
    }

    #[test]
    fn test_unknown_does_not_degrade() {
        let db = with_status("database", HealthStatus::Unknown);
        let email = with_status("email-service", HealthStatus::Healthy);
        assert_eq!(
            aggregate_status([(&db, true), (&email, false)]),
            OverallStatus::Healthy
        );
    }

    #[test]
    fn test_no_services_is_healthy() {
        let none: Vec<(&ServiceHealth, bool)> = Vec::new();
        assert_eq!(aggregate_status(none), OverallStatus::Healthy);
    }

    #[test]
    fn test_system_health_json_shape() {
        let snapshot = SystemHealth {
            overall: OverallStatus::Degraded,
            services: vec![
                with_status("database", HealthStatus::Healthy).with_response_time(42),
                ServiceHealth::degraded("email-service", "SendGrid status: minor"),
            ],
            timestamp: Utc::now(),
            uptime_seconds: 12345,
            version: "1.5.0".to_string(),
            request_id: Some("abc-123".to_string()),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["overall"], "degraded");
        assert_eq!(json["uptimeSeconds"], 12345);
        assert_eq!(json["version"], "1.5.0");
        assert_eq!(json["requestId"], "abc-123");
        assert_eq!(json["services"][0]["responseTimeMs"], 42);
        assert_eq!(json["services"][1]["error"], "SendGrid status: minor");
        assert!(snapshot.service("email-service").is_some());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn status_strategy() -> impl Strategy<Value = HealthStatus> {
            prop_oneof![
                Just(HealthStatus::Healthy),
                Just(HealthStatus::Degraded),
                Just(HealthStatus::Unhealthy),
                Just(HealthStatus::Unknown),
            ]
        }

        proptest! {
            /// Aggregation matches the rule definition for any mix of results.
            #[test]
            fn prop_aggregate_matches_rules(
                entries in proptest::collection::vec((status_strategy(), any::<bool>()), 0..12)
            ) {
                let services: Vec<(ServiceHealth, bool)> = entries
                    .iter()
                    .enumerate()
                    .map(|(i, (status, critical))| (with_status(&format!("svc-{}", i), *status), *critical))
                    .collect();

                let overall = aggregate_status(services.iter().map(|(h, c)| (h, *c)));

                let critical_down = entries
                    .iter()
                    .any(|(s, c)| *c && *s == HealthStatus::Unhealthy);
                let any_bad = entries
                    .iter()
                    .any(|(s, _)| matches!(s, HealthStatus::Unhealthy | HealthStatus::Degraded));

                let expected = if critical_down {
                    OverallStatus::Unhealthy
                } else if any_bad {
                    OverallStatus::Degraded
                } else {
                    OverallStatus::Healthy
                };
                prop_assert_eq!(overall, expected);
            }
        }
    }
}
