//! Integration tests for built-in probes against mock HTTP servers.

use healthguard::config::{HealthguardConfig, ProbeConfig, ServiceConfig};
use healthguard::health::{HealthProbe, HealthStatus, ProbeError, ServiceMetadata};
use healthguard::probes::{build_client, build_definitions, HttpProbe, StatusPageProbe};
use healthguard::system::{OverallStatus, SystemHealthChecker};
use std::net::TcpListener;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_probe(url: String, threshold: Duration) -> HttpProbe {
    HttpProbe::new("api", url, threshold, build_client().unwrap())
}

fn status_page_probe(url: String) -> StatusPageProbe {
    StatusPageProbe::new("email-service", url, "SendGrid", build_client().unwrap())
}

async fn status_page_server(indicator: &str) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/status.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "page": {"id": "abc", "name": "SendGrid"},
            "status": {"indicator": indicator, "description": "Status"}
        })))
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test]
async fn test_http_probe_success_is_healthy() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let probe = http_probe(
        format!("{}/health", mock_server.uri()),
        Duration::from_secs(5),
    );
    let health = probe.check().await.unwrap();

    assert_eq!(health.status, HealthStatus::Healthy);
    assert!(health.response_time_ms.is_some());
    assert_eq!(
        health.metadata,
        Some(ServiceMetadata::Http {
            status_code: 200,
            indicator: None
        })
    );
}

#[tokio::test]
async fn test_http_probe_slow_response_is_degraded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(150)))
        .mount(&mock_server)
        .await;

    let probe = http_probe(mock_server.uri(), Duration::from_millis(50));
    let health = probe.check().await.unwrap();

    assert_eq!(health.status, HealthStatus::Degraded);
    assert!(health.error.unwrap().contains("slow response"));
}

#[tokio::test]
async fn test_http_probe_server_error_is_unhealthy() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let probe = http_probe(mock_server.uri(), Duration::from_secs(5));
    let health = probe.check().await.unwrap();

    assert_eq!(health.status, HealthStatus::Unhealthy);
    assert_eq!(health.error.as_deref(), Some("HTTP 503"));
}

#[tokio::test]
async fn test_http_probe_client_error_is_degraded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let probe = http_probe(mock_server.uri(), Duration::from_secs(5));
    let health = probe.check().await.unwrap();

    assert_eq!(health.status, HealthStatus::Degraded);
}

#[tokio::test]
async fn test_http_closed_port_is_request_error() {
    // Bind then drop to get a port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let check = http_probe(format!("http://{}/health", address), Duration::from_secs(5));
    let result = check.check().await;

    assert!(
        matches!(result, Err(ProbeError::Request(_))),
        "expected transport error, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_status_page_none_is_healthy() {
    let mock_server = status_page_server("none").await;
    let probe = status_page_probe(format!("{}/api/v2/status.json", mock_server.uri()));

    let health = probe.check().await.unwrap();

    assert_eq!(health.status, HealthStatus::Healthy);
    assert!(health.error.is_none());
    assert_eq!(
        health.metadata,
        Some(ServiceMetadata::Http {
            status_code: 200,
            indicator: Some("none".to_string())
        })
    );
}

#[tokio::test]
async fn test_status_page_minor_is_degraded() {
    let mock_server = status_page_server("minor").await;
    let probe = status_page_probe(format!("{}/api/v2/status.json", mock_server.uri()));

    let health = probe.check().await.unwrap();

    assert_eq!(health.status, HealthStatus::Degraded);
    assert_eq!(health.error.as_deref(), Some("SendGrid status: minor"));
}

#[tokio::test]
async fn test_status_page_major_is_unhealthy() {
    let mock_server = status_page_server("major").await;
    let probe = status_page_probe(format!("{}/api/v2/status.json", mock_server.uri()));

    let health = probe.check().await.unwrap();

    assert_eq!(health.status, HealthStatus::Unhealthy);
    assert_eq!(health.error.as_deref(), Some("SendGrid status: major"));
}

#[tokio::test]
async fn test_status_page_http_error_is_degraded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let probe = status_page_probe(mock_server.uri());
    let health = probe.check().await.unwrap();

    assert_eq!(health.status, HealthStatus::Degraded);
    assert!(health.error.unwrap().contains("HTTP 502"));
}

#[tokio::test]
async fn test_status_page_invalid_body_is_probe_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let probe = status_page_probe(mock_server.uri());
    let result = probe.check().await;

    assert!(matches!(result, Err(ProbeError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_configured_services_end_to_end() {
    let status_page = status_page_server("minor").await;
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&api)
        .await;

    let mut config = HealthguardConfig::default();
    config.services = vec![
        ServiceConfig {
            name: "api".to_string(),
            critical: true,
            probe: ProbeConfig::Http {
                url: api.uri(),
                degraded_threshold_ms: 5_000,
            },
        },
        ServiceConfig {
            name: "email-service".to_string(),
            critical: false,
            probe: ProbeConfig::StatusPage {
                url: format!("{}/api/v2/status.json", status_page.uri()),
                provider: None,
            },
        },
    ];

    let definitions = build_definitions(&config).unwrap();
    let checker = SystemHealthChecker::new(definitions, config.breakers);
    let health = checker.check_system_health(None).await;

    assert_eq!(health.overall, OverallStatus::Degraded);
    let email = health.service("email-service").unwrap();
    // Provider defaults to the service name
    assert_eq!(email.error.as_deref(), Some("email-service status: minor"));
}
