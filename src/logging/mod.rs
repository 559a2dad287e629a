//! Structured logging setup
//!
//! Logs always go to stderr so that report output on stdout (including
//! `--json`) stays machine-readable.

mod request_id;

pub use request_id::generate_request_id;

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build filter directives string from LoggingConfig
///
/// Constructs a tracing filter string that includes the base log level
/// and any component-specific log levels, in component name order.
///
/// # Examples
///
/// ```
/// use healthguard::config::{LogFormat, LoggingConfig};
/// use healthguard::logging::build_filter_directives;
/// use std::collections::BTreeMap;
///
/// let mut component_levels = BTreeMap::new();
/// component_levels.insert("circuit_breaker".to_string(), "debug".to_string());
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Pretty,
///     component_levels: Some(component_levels),
/// };
///
/// let filter_str = build_filter_directives(&config);
/// assert_eq!(filter_str, "info,healthguard::circuit_breaker=debug");
/// ```
pub fn build_filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        for (component, level) in component_levels {
            filter_str.push_str(&format!(",healthguard::{}={}", component, level));
        }
    }

    filter_str
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured levels. Fails if a
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}
