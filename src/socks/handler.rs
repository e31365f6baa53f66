//! Main SOCKS5 handler
//!
//! Runs one connection cycle: negotiation, request, dial, relay. The
//! handler owns the client stream, so it is closed exactly once when the
//! cycle ends, whichever stage it ended in.

use crate::config::SocksConfig;
use crate::error::ProxyError;
use crate::socks::codec::write_reply;
use crate::socks::connector::connect_target;
use crate::socks::negotiate::negotiate;
use crate::socks::relay::RelaySession;
use crate::socks::request::parse_request;
use crate::socks::types::HandshakeStage;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tracing::{debug, info, warn};

/// Handle SOCKS5 protocol on an accepted client stream
///
/// # Protocol Flow
///
/// 1. Method negotiation
/// 2. CONNECT request parsing
/// 3. Target dial and success reply
/// 4. Bidirectional relay
///
/// Failures are logged with the stage they happened in and returned.
pub async fn handle_connection<S>(
    stream: S,
    peer: SocketAddr,
    config: &SocksConfig,
) -> Result<(), ProxyError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let mut stage = HandshakeStage::Greeting;
    let result = run_cycle(stream, config, &mut stage).await;

    match &result {
        Ok(()) => debug!("Connection from {} finished", peer),
        Err(e) => warn!("Connection from {} failed at {}: {}", peer, stage, e),
    }

    result
}

async fn run_cycle<S>(
    stream: S,
    config: &SocksConfig,
    stage: &mut HandshakeStage,
) -> Result<(), ProxyError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    // One buffer for the whole cycle, so pipelined bytes reach the relay.
    let mut client = BufReader::new(stream);

    negotiate(&mut client, config).await?;
    *stage = HandshakeStage::Negotiated;

    let target = match parse_request(&mut client).await {
        Ok(target) => target,
        Err(ProxyError::Socks5(e)) => {
            if config.reply_on_error {
                if let Some(code) = e.reply_code() {
                    write_reply(&mut client, code).await?;
                }
            }
            return Err(e.into());
        }
        Err(e) => return Err(e),
    };
    *stage = HandshakeStage::RequestParsed;
    info!("SOCKS5 CONNECT request to {}", target);

    let target_stream = connect_target(&mut client, &target, config).await?;
    *stage = HandshakeStage::Connected;
    debug!("Starting relay to {}", target);

    *stage = HandshakeStage::Relaying;
    RelaySession::new().run(client, target_stream).await;
    *stage = HandshakeStage::Done;

    Ok(())
}
