//! Watch command implementation

use crate::cli::output::format_watch_line;
use crate::system::SystemHealthChecker;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

/// Print a summary line for every periodic check until Ctrl-C.
pub async fn handle_watch(
    checker: Arc<SystemHealthChecker>,
    interval: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let cancel_token = CancellationToken::new();
    let mut updates = checker.subscribe();
    let handle = Arc::clone(&checker).start(interval, cancel_token.clone());

    println!(
        "Watching {} service(s) every {}s. Press Ctrl-C to stop.",
        checker.services().len(),
        interval.as_secs()
    );

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::info!("Interrupt received, stopping watch");
                break;
            }
            update = updates.recv() => match update {
                Ok(snapshot) => println!("{}", format_watch_line(&snapshot)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Output fell behind, skipped snapshots");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    cancel_token.cancel();
    handle.await?;

    Ok(())
}
