//! Monitored service definitions

use serde::{Deserialize, Serialize};

fn default_degraded_threshold_ms() -> u64 {
    2_000
}

/// How a service is probed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProbeConfig {
    /// Plain HTTP GET; the status code decides health
    Http {
        url: String,
        /// Responses slower than this are reported degraded
        #[serde(default = "default_degraded_threshold_ms")]
        degraded_threshold_ms: u64,
    },
    /// Statuspage-style `status.json` document published by a provider
    StatusPage {
        url: String,
        /// Display name used in error messages (defaults to the service name)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider: Option<String>,
    },
    /// TCP connect to `host:port`
    Tcp {
        address: String,
        #[serde(default = "default_degraded_threshold_ms")]
        degraded_threshold_ms: u64,
    },
}

impl ProbeConfig {
    /// The URL or address this probe targets.
    pub fn target(&self) -> &str {
        match self {
            ProbeConfig::Http { url, .. } | ProbeConfig::StatusPage { url, .. } => url,
            ProbeConfig::Tcp { address, .. } => address,
        }
    }
}

/// One monitored dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    /// Critical services make the system unhealthy when they are unhealthy
    #[serde(default)]
    pub critical: bool,
    pub probe: ProbeConfig,
}
