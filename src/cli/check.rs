//! Check command implementation

use crate::cli::output::{format_system_pretty, service_views};
use crate::cli::CheckArgs;
use crate::system::{SystemHealth, SystemHealthChecker};

/// Run one system check and render it.
///
/// Returns the rendered report together with the snapshot so the caller can
/// pick an exit code.
pub async fn handle_check(
    args: &CheckArgs,
    checker: &SystemHealthChecker,
) -> Result<(String, SystemHealth), Box<dyn std::error::Error>> {
    let request_id = args
        .request_id
        .clone()
        .unwrap_or_else(crate::logging::generate_request_id);

    let health = checker.check_system_health(Some(request_id)).await;

    let output = if args.json {
        serde_json::to_string_pretty(&health)?
    } else {
        format_system_pretty(&health, &service_views(&health, checker))
    };

    Ok((output, health))
}
