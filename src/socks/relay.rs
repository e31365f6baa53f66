//! Bidirectional relay between client and target
//!
//! Each direction is copied by its own task. Both tasks share one
//! cancellation token; whichever finishes first fires it, and the session
//! then tears down the other direction so both streams are dropped.

use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One relay phase between a client stream and a target stream
#[derive(Debug, Default)]
pub struct RelaySession {
    cancel: CancellationToken,
}

impl RelaySession {
    /// Create a session with a fresh cancellation token
    pub fn new() -> Self {
        Self::default()
    }

    /// Relay until either direction reaches EOF or fails
    ///
    /// Returns once both copy tasks are gone, at which point every half of
    /// both streams has been dropped and the underlying sockets are closed.
    pub async fn run<C, T>(self, client: C, target: T)
    where
        C: AsyncRead + AsyncWrite + Send + 'static,
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (client_read, client_write) = tokio::io::split(client);
        let (target_read, target_write) = tokio::io::split(target);

        let upstream = tokio::spawn(copy_direction(
            "client->target",
            client_read,
            target_write,
            self.cancel.clone(),
        ));
        let downstream = tokio::spawn(copy_direction(
            "target->client",
            target_read,
            client_write,
            self.cancel.clone(),
        ));

        self.cancel.cancelled().await;

        // The loser is parked on IO; aborting it drops its halves.
        upstream.abort();
        downstream.abort();
        let _ = upstream.await;
        let _ = downstream.await;
    }
}

async fn copy_direction<R, W>(
    direction: &'static str,
    mut reader: R,
    mut writer: W,
    done: CancellationToken,
) where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    // Fires on normal completion and on abort alike.
    let _done = done.drop_guard();

    match tokio::io::copy(&mut reader, &mut writer).await {
        Ok(bytes) => debug!("{} finished: {} bytes", direction, bytes),
        Err(e) => debug!("{} error: {}", direction, e),
    }
}
