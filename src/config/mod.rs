//! Configuration module for healthguard
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`HEALTHGUARD_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use healthguard::config::HealthguardConfig;
//!
//! let toml = r#"
//! [[services]]
//! name = "database"
//! critical = true
//! [services.probe]
//! type = "tcp"
//! address = "localhost:5432"
//! "#;
//! let config: HealthguardConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.services.len(), 1);
//! assert_eq!(config.breakers.critical.failure_threshold, 3);
//! ```

pub mod error;
pub mod logging;
pub mod service;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use service::{ProbeConfig, ServiceConfig};

// Re-export breaker settings from the modules that own them
pub use crate::circuit_breaker::CircuitBreakerConfig;
pub use crate::system::BreakerProfiles;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Identity reported in health snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    /// Version reported in snapshots; defaults to the crate version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "healthguard".to_string(),
            version: None,
        }
    }
}

/// Background monitoring settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between system checks in watch mode
    pub interval_seconds: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 30,
        }
    }
}

/// Unified configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HealthguardConfig {
    pub app: AppConfig,
    /// Circuit breaker settings for critical and standard services
    pub breakers: BreakerProfiles,
    pub monitor: MonitorConfig,
    /// Monitored services in registration order
    pub services: Vec<ServiceConfig>,
    pub logging: LoggingConfig,
}

impl HealthguardConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are ignored (the current value is kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("HEALTHGUARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("HEALTHGUARD_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
        if let Ok(version) = std::env::var("HEALTHGUARD_VERSION") {
            self.app.version = Some(version);
        }
        if let Ok(interval) = std::env::var("HEALTHGUARD_INTERVAL") {
            if let Ok(seconds) = interval.parse() {
                self.monitor.interval_seconds = seconds;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_breaker("breakers.critical", &self.breakers.critical)?;
        validate_breaker("breakers.standard", &self.breakers.standard)?;
        self.logging.validate()?;

        if self.monitor.interval_seconds == 0 {
            return Err(ConfigError::validation(
                "monitor.interval_seconds",
                "interval must be non-zero",
            ));
        }

        let mut seen = HashSet::new();
        for (i, service) in self.services.iter().enumerate() {
            if service.name.trim().is_empty() {
                return Err(ConfigError::validation(
                    format!("services[{}].name", i),
                    "name cannot be empty",
                ));
            }
            if !seen.insert(service.name.as_str()) {
                return Err(ConfigError::validation(
                    format!("services[{}].name", i),
                    format!("duplicate service name '{}'", service.name),
                ));
            }
            if service.probe.target().trim().is_empty() {
                return Err(ConfigError::validation(
                    format!("services[{}].probe", i),
                    "probe target cannot be empty",
                ));
            }
        }

        Ok(())
    }

    /// Version to report, falling back to the crate version.
    pub fn version(&self) -> String {
        self.app
            .version
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
    }
}

fn validate_breaker(field: &str, config: &CircuitBreakerConfig) -> Result<(), ConfigError> {
    if config.failure_threshold == 0 {
        return Err(ConfigError::validation(
            format!("{}.failure_threshold", field),
            "threshold must be greater than zero",
        ));
    }
    if config.open_timeout_ms == 0 {
        return Err(ConfigError::validation(
            format!("{}.open_timeout_ms", field),
            "timeout must be greater than zero",
        ));
    }
    if config.operation_timeout_ms == 0 {
        return Err(ConfigError::validation(
            format!("{}.operation_timeout_ms", field),
            "timeout must be greater than zero",
        ));
    }
    Ok(())
}
