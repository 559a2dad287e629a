//! Output formatting helpers for CLI commands

use crate::circuit_breaker::{CircuitBreakerStatus, CircuitState};
use crate::health::{HealthStatus, ServiceHealth};
use crate::system::{OverallStatus, SystemHealth, SystemHealthChecker};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// View model for one row of the services table
#[derive(Debug, Clone, Serialize)]
pub struct ServiceView {
    pub name: String,
    pub status: HealthStatus,
    pub critical: bool,
    pub response_time_ms: Option<u64>,
    pub circuit: CircuitState,
    pub error: Option<String>,
}

impl ServiceView {
    pub fn new(health: &ServiceHealth, critical: bool, circuit: CircuitState) -> Self {
        Self {
            name: health.name.clone(),
            status: health.status,
            critical,
            response_time_ms: health.response_time_ms,
            circuit,
            error: health.error.clone(),
        }
    }
}

/// Pair each result in `health` with its criticality and breaker state.
pub fn service_views(health: &SystemHealth, checker: &SystemHealthChecker) -> Vec<ServiceView> {
    let breakers = checker.circuit_breaker_states();
    health
        .services
        .iter()
        .map(|s| {
            ServiceView::new(
                s,
                checker.is_critical(&s.name),
                circuit_of(&breakers, &s.name),
            )
        })
        .collect()
}

fn circuit_of(breakers: &BTreeMap<String, CircuitBreakerStatus>, name: &str) -> CircuitState {
    breakers.get(name).map(|b| b.state).unwrap_or_default()
}

/// Format services as a table
pub fn format_services_table(services: &[ServiceView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Service", "Status", "Critical", "Latency", "Circuit", "Details",
    ]);

    for s in services {
        table.add_row(vec![
            Cell::new(&s.name),
            Cell::new(status_label(s.status)),
            Cell::new(if s.critical { "yes" } else { "no" }),
            Cell::new(
                s.response_time_ms
                    .map(|ms| format!("{}ms", ms))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(circuit_label(s.circuit)),
            Cell::new(s.error.as_deref().unwrap_or("")),
        ]);
    }

    table.to_string()
}

/// Format a system snapshot as pretty text
pub fn format_system_pretty(health: &SystemHealth, services: &[ServiceView]) -> String {
    let mut output = String::new();

    let healthy = health
        .services
        .iter()
        .filter(|s| s.status == HealthStatus::Healthy)
        .count();

    let _ = writeln!(output, "Status: {}", overall_label(health.overall));
    let _ = writeln!(output, "Version: {}", health.version);
    let _ = writeln!(output, "Uptime: {}", format_duration(health.uptime_seconds));
    let _ = writeln!(
        output,
        "Checked: {}",
        health.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(request_id) = &health.request_id {
        let _ = writeln!(output, "Request: {}", request_id);
    }
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Services: {}/{} healthy",
        healthy,
        health.services.len()
    );

    if !services.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "{}", format_services_table(services));
    }

    output
}

/// Format a single service result as pretty text
pub fn format_service_pretty(view: &ServiceView, health: &ServiceHealth) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{} {}", status_icon(view.status), view.name.bold());
    let _ = writeln!(output, "  Status: {}", status_label(view.status));
    if view.critical {
        let _ = writeln!(output, "  Critical: yes");
    }
    if let Some(ms) = view.response_time_ms {
        let _ = writeln!(output, "  Latency: {}ms", ms);
    }
    let _ = writeln!(output, "  Circuit: {}", circuit_label(view.circuit));
    let _ = writeln!(
        output,
        "  Checked: {}",
        health.last_check.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(error) = &view.error {
        let _ = writeln!(output, "  Error: {}", error);
    }

    output
}

/// One-line summary used by `watch`
pub fn format_watch_line(health: &SystemHealth) -> String {
    let mut line = format!(
        "[{}] {}",
        health.timestamp.format("%H:%M:%S"),
        overall_label(health.overall)
    );
    for s in &health.services {
        let _ = write!(line, "  {} {}", status_icon(s.status), s.name);
    }
    line
}

pub fn status_label(status: HealthStatus) -> ColoredString {
    match status {
        HealthStatus::Healthy => "Healthy".green(),
        HealthStatus::Degraded => "Degraded".yellow(),
        HealthStatus::Unhealthy => "Unhealthy".red(),
        HealthStatus::Unknown => "Unknown".dimmed(),
    }
}

pub fn overall_label(status: OverallStatus) -> ColoredString {
    match status {
        OverallStatus::Healthy => "Healthy".green().bold(),
        OverallStatus::Degraded => "Degraded".yellow().bold(),
        OverallStatus::Unhealthy => "Unhealthy".red().bold(),
    }
}

pub fn circuit_label(state: CircuitState) -> ColoredString {
    match state {
        CircuitState::Closed => "closed".normal(),
        CircuitState::HalfOpen => "half-open".yellow(),
        CircuitState::Open => "open".red(),
    }
}

/// Get status icon for a service status
pub fn status_icon(status: HealthStatus) -> ColoredString {
    match status {
        HealthStatus::Healthy => "✓".green(),
        HealthStatus::Degraded => "~".yellow(),
        HealthStatus::Unhealthy => "✗".red(),
        HealthStatus::Unknown => "?".dimmed(),
    }
}

/// Format duration in a human-readable way
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}
