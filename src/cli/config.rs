//! `healthguard config init`
//!
//! Writes the bundled example configuration. The template is parsed and
//! validated before anything touches disk.

use crate::cli::ConfigInitArgs;
use crate::config::{ConfigError, HealthguardConfig};
use std::fs;

const EXAMPLE_CONFIG: &str = include_str!("../../healthguard.example.toml");

pub fn handle_config_init(args: &ConfigInitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = bundled_template()?;

    if args.output.exists() && !args.force {
        return Err(format!(
            "{} already exists, pass --force to replace it",
            args.output.display()
        )
        .into());
    }

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.output, EXAMPLE_CONFIG)?;

    println!("✓ Wrote {}", args.output.display());
    println!("{}", describe_services(&config));

    Ok(())
}

fn bundled_template() -> Result<HealthguardConfig, ConfigError> {
    let config: HealthguardConfig =
        toml::from_str(EXAMPLE_CONFIG).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// One-line summary of the services a config registers.
fn describe_services(config: &HealthguardConfig) -> String {
    let critical = config.services.iter().filter(|s| s.critical).count();
    let names: Vec<&str> = config.services.iter().map(|s| s.name.as_str()).collect();
    format!(
        "  {} services ({} critical): {}",
        names.len(),
        critical,
        names.join(", ")
    )
}
