use tokio_util::sync::CancellationToken;

/// Cancels `ct` on the first ctrl-c / SIGINT.
pub fn cancel_on_signal(ct: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if let Err(err) = res {
                    tracing::error!("Failed to listen for shutdown signal: {}", err);
                    return;
                }
                tracing::info!("Shutdown signal received");
                ct.cancel();
            }
            _ = ct.cancelled() => {}
        }
    });
}
