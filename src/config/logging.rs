//! `[logging]` section
//!
//! ```toml
//! [logging]
//! level = "warn"
//! format = "json"
//!
//! [logging.component_levels]
//! circuit_breaker = "debug"
//! ```
//!
//! Component names are modules under `healthguard::` (`circuit_breaker`,
//! `health`, `system`, `probes`, `cli`).

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines on stderr
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::validation(
                "logging.format",
                format!("expected 'pretty' or 'json', got '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level; quiet by default so reports on stdout stand alone
    pub level: String,
    pub format: LogFormat,
    /// Per-module overrides, applied in name order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_levels: Option<BTreeMap<String, String>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
            component_levels: None,
        }
    }
}

impl LoggingConfig {
    /// Reject levels `tracing` cannot parse, so a typo fails at startup
    /// instead of silently disabling a filter directive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_level("logging.level", &self.level)?;
        for (component, level) in self.component_levels.iter().flatten() {
            if component.trim().is_empty() {
                return Err(ConfigError::validation(
                    "logging.component_levels",
                    "component name cannot be empty",
                ));
            }
            check_level(&format!("logging.component_levels.{}", component), level)?;
        }
        Ok(())
    }
}

fn check_level(field: &str, level: &str) -> Result<(), ConfigError> {
    level
        .parse::<LevelFilter>()
        .map(|_| ())
        .map_err(|_| ConfigError::validation(field, format!("unknown log level '{}'", level)))
}
