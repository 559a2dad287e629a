//! Service command implementation

use crate::cli::output::{format_service_pretty, ServiceView};
use crate::cli::ServiceArgs;
use crate::system::SystemHealthChecker;

/// Check one service by name and render the result.
pub async fn handle_service(
    args: &ServiceArgs,
    checker: &SystemHealthChecker,
) -> Result<String, Box<dyn std::error::Error>> {
    let health = checker.check_specific_service(&args.name).await?;

    if args.json {
        return Ok(serde_json::to_string_pretty(&health)?);
    }

    let circuit = checker
        .circuit_breaker_states()
        .get(&args.name)
        .map(|b| b.state)
        .unwrap_or_default();
    let view = ServiceView::new(&health, checker.is_critical(&args.name), circuit);
    Ok(format_service_pretty(&view, &health))
}
