//! CLI module for healthguard
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `check` - Check every configured service once
//! - `service` - Check a single service
//! - `watch` - Check periodically until interrupted
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # One-off check, exit code 2 when a critical service is down
//! healthguard check -c healthguard.toml
//!
//! # Machine-readable report
//! healthguard check --json
//!
//! # Generate shell completions
//! healthguard completions bash > ~/.bash_completion.d/healthguard
//! ```

pub mod check;
pub mod completions;
pub mod config;
pub mod output;
pub mod service;
pub mod watch;

pub use check::handle_check;
pub use completions::handle_completions;
pub use config::handle_config_init;
pub use service::handle_service;
pub use watch::handle_watch;

use crate::config::HealthguardConfig;
use crate::system::SystemHealthChecker;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "healthguard.toml";

/// healthguard - dependency health monitoring with circuit breakers
#[derive(Parser, Debug)]
#[command(
    name = "healthguard",
    version,
    about = "Dependency health monitoring with circuit breakers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check all configured services once
    Check(CheckArgs),
    /// Check a single service
    Service(ServiceArgs),
    /// Check all services periodically until interrupted
    Watch(WatchArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every command that runs checks
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to configuration file [default: healthguard.toml if present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HEALTHGUARD_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Correlation ID to attach to the report (generated when omitted)
    #[arg(long)]
    pub request_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct ServiceArgs {
    /// Name of the service to check
    pub name: String,

    #[command(flatten)]
    pub run: RunArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Seconds between checks (overrides monitor.interval_seconds)
    #[arg(short, long)]
    pub interval: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Configuration for a run and the file it came from.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: HealthguardConfig,
    /// `None` when no file was found and defaults were used
    pub source: Option<PathBuf>,
}

impl LoadedConfig {
    /// Report where configuration came from. Call once tracing is installed.
    pub fn log_source(&self) {
        match &self.source {
            Some(path) => tracing::debug!(
                path = %path.display(),
                services = self.config.services.len(),
                "Loaded config file"
            ),
            None => tracing::debug!(
                path = DEFAULT_CONFIG_PATH,
                "No config file found, using defaults"
            ),
        }
    }
}

/// Pick the config file for a run.
///
/// An explicit path is always used (and must exist when loaded). Otherwise
/// `default` is used only if it exists.
pub fn resolve_config_path(explicit: Option<&Path>, default: &Path) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None if default.exists() => Some(default.to_path_buf()),
        None => None,
    }
}

/// Resolve, load and validate configuration for a run.
///
/// Without `--config`, `healthguard.toml` in the working directory is used
/// when present, otherwise defaults (no services).
pub fn load_config(args: &RunArgs) -> Result<LoadedConfig, Box<dyn std::error::Error>> {
    let source = resolve_config_path(args.config.as_deref(), Path::new(DEFAULT_CONFIG_PATH));
    let mut config = HealthguardConfig::load(source.as_deref())?.with_env_overrides();
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    config.validate()?;

    Ok(LoadedConfig { config, source })
}

/// Build a checker for every service in `config`.
pub fn build_checker(
    config: &HealthguardConfig,
) -> Result<SystemHealthChecker, Box<dyn std::error::Error>> {
    let definitions = crate::probes::build_definitions(config)?;
    Ok(SystemHealthChecker::new(definitions, config.breakers).with_version(config.version()))
}
