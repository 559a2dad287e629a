use clap::Parser;
use healthguard::cli::{
    build_checker, handle_check, handle_completions, handle_config_init, handle_service,
    handle_watch, load_config, CheckArgs, Cli, Commands, ConfigCommands, RunArgs, ServiceArgs,
    WatchArgs,
};
use healthguard::config::HealthguardConfig;
use healthguard::system::OverallStatus;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

/// Exit code when a critical service is unhealthy
const EXIT_UNHEALTHY: i32 = 2;

/// Load configuration and install logging for commands that run checks.
fn prepare(run: &RunArgs) -> Result<HealthguardConfig, Box<dyn Error>> {
    let loaded = load_config(run)?;
    if let Err(e) = healthguard::logging::init_tracing(&loaded.config.logging) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    loaded.log_source();
    Ok(loaded.config)
}

/// Returns whether the system is unhealthy.
async fn run_check(args: CheckArgs) -> Result<bool, Box<dyn Error>> {
    let config = prepare(&args.run)?;
    let checker = build_checker(&config)?;
    let (output, health) = handle_check(&args, &checker).await?;
    println!("{}", output);
    Ok(health.overall == OverallStatus::Unhealthy)
}

async fn run_service(args: ServiceArgs) -> Result<bool, Box<dyn Error>> {
    let config = prepare(&args.run)?;
    let checker = build_checker(&config)?;
    println!("{}", handle_service(&args, &checker).await?);
    Ok(false)
}

async fn run_watch(args: WatchArgs) -> Result<bool, Box<dyn Error>> {
    let config = prepare(&args.run)?;
    let seconds = args.interval.unwrap_or(config.monitor.interval_seconds);
    if seconds == 0 {
        return Err("interval must be greater than zero".into());
    }
    let checker = Arc::new(build_checker(&config)?);
    handle_watch(checker, Duration::from_secs(seconds)).await?;
    Ok(false)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check(args) => run_check(args).await,
        Commands::Service(args) => run_service(args).await,
        Commands::Watch(args) => run_watch(args).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args).map(|_| false),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(false)
        }
    };

    match result {
        Ok(true) => std::process::exit(EXIT_UNHEALTHY),
        Ok(false) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
