use quarkboard_core::config::AppConfig;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let server = quarkboard_runtime::boot(config)?.into_server();

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(tokio::signal::ctrl_c(), cancel.clone()));

    server.run(cancel).await?;
    Ok(())
}

/// Cancel once `signal` fires. A signal that cannot be installed leaves the
/// server running; it can still be stopped by killing the process.
async fn cancel_on_signal(
    signal: impl Future<Output = std::io::Result<()>>,
    cancel: CancellationToken,
) {
    match signal.await {
        Ok(()) => {
            info!("Interrupted, shutting down");
            cancel.cancel();
        }
        Err(e) => warn!("Failed to listen for Ctrl-C, shutdown on signal disabled: {}", e),
    }
}
