//! Accept loop
//!
//! Binds the fixed listen address and spawns one task per accepted
//! connection. Connections share nothing but the read-only configuration.

use crate::config::{Config, LISTEN_ADDR};
use crate::socks::handle_connection;
use anyhow::{Context, Result};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{error, info};

/// Pause after a failed accept, so a persistent error (e.g. EMFILE) does
/// not spin the loop
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Bind the proxy listener on [`LISTEN_ADDR`]
pub async fn bind() -> Result<TcpListener> {
    TcpListener::bind(LISTEN_ADDR)
        .await
        .with_context(|| format!("Failed to bind {}", LISTEN_ADDR))
}

/// Accept connections until a shutdown signal arrives
///
/// Accept errors are logged and the loop retries after a short pause.
/// Relays already in flight are left running when the loop stops.
pub async fn serve(
    listener: TcpListener,
    config: Config,
    mut shutdown_rx: broadcast::Receiver<bool>,
) -> Result<()> {
    let local_addr = listener.local_addr()?;
    info!("SOCKS5 server listening on {}", local_addr);

    let socks = Arc::new(config.socks);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        info!("Accepted connection from {}", peer);
                        let socks = socks.clone();
                        tokio::spawn(async move {
                            // Failures are already logged by the handler.
                            let _ = handle_connection(stream, peer, &socks).await;
                        });
                    }
                    Err(e) => accept_failed(&e).await,
                }
            }
            _ = shutdown_rx.recv() => {
                info!("Shutdown signal received, stopping accept loop");
                break;
            }
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn accept_failed(e: &io::Error) {
    error!("Accept failed: {}", e);
    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
}

/// Bind [`LISTEN_ADDR`] and serve until shutdown
pub async fn run_server(config: Config, shutdown_rx: broadcast::Receiver<bool>) -> Result<()> {
    let listener = bind().await?;
    serve(listener, config, shutdown_rx).await
}
