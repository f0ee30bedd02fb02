use std::sync::Arc;

use anyhow::{Context, Result};
use hello_asset::ProbeService;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::signals::wait_for_shutdown;

/// Bind `bind_host:port` and serve the probe router until a shutdown signal.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(config: &ServerConfig, service: ProbeService) -> Result<()> {
    let addr = format!("{}:{}", config.bind_host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    let app = hello_asset::router(Arc::new(service));
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = wait_for_shutdown().await {
                tracing::error!(error = %e, "signal handling failed, shutting down");
            }
        })
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}
