//! Outbound connection for the CONNECT command
//!
//! Dials the requested target and tells the client the tunnel is ready.

use super::codec::write_reply;
use super::types::TargetAddr;
use crate::config::SocksConfig;
use crate::error::{ProxyError, Socks5ReplyCode};
use std::io;
use tokio::io::AsyncWrite;
use tokio::net::TcpStream;
use tracing::{debug, info};

/// Dial `target` and send the success reply
///
/// Domain names go through the system resolver as part of the dial.
/// On failure nothing is written unless `reply_on_error` is set, in which
/// case the reply code is derived from the dial error.
pub async fn connect_target<W>(
    client: &mut W,
    target: &TargetAddr,
    config: &SocksConfig,
) -> Result<TcpStream, ProxyError>
where
    W: AsyncWrite + Unpin,
{
    let dial_target = target.dial_target();
    debug!("Connecting to target: {}", dial_target);

    let target_stream = match dial(&dial_target, config).await {
        Ok(stream) => stream,
        Err(e) => {
            if config.reply_on_error {
                write_reply(client, Socks5ReplyCode::from(&e)).await?;
            }
            return Err(ProxyError::DialFailed {
                target: dial_target,
                source: e,
            });
        }
    };

    write_reply(client, Socks5ReplyCode::Succeeded).await?;

    info!("SOCKS5 tunnel established to {}", dial_target);
    Ok(target_stream)
}

async fn dial(target: &str, config: &SocksConfig) -> io::Result<TcpStream> {
    match config.connect_timeout() {
        Some(timeout) => tokio::time::timeout(timeout, TcpStream::connect(target))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timed out"))?,
        None => TcpStream::connect(target).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connect_target_success_reply() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut client = Vec::new();
        let target = TargetAddr::ipv4(Ipv4Addr::LOCALHOST, port);
        let stream = connect_target(&mut client, &target, &SocksConfig::default())
            .await
            .unwrap();

        assert_eq!(client, vec![0x05, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(stream.peer_addr().unwrap().port(), port);
    }

    #[tokio::test]
    async fn test_connect_target_domain() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut client = Vec::new();
        let target = TargetAddr::domain("localhost", port);
        // Every resolved address is tried, so a leading ::1 falls through to 127.0.0.1.
        let stream = connect_target(&mut client, &target, &SocksConfig::default())
            .await
            .unwrap();

        assert_eq!(client, vec![0x05, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(stream.peer_addr().unwrap().port(), port);
    }

    #[tokio::test]
    async fn test_connect_target_refused_sends_nothing() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut client = Vec::new();
        let target = TargetAddr::ipv4(Ipv4Addr::LOCALHOST, port);
        let err = connect_target(&mut client, &target, &SocksConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProxyError::DialFailed { .. }));
        assert!(client.is_empty());
    }

    #[tokio::test]
    async fn test_connect_target_refused_with_reply() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = SocksConfig {
            reply_on_error: true,
            ..Default::default()
        };
        let mut client = Vec::new();
        let target = TargetAddr::ipv4(Ipv4Addr::LOCALHOST, port);
        let err = connect_target(&mut client, &target, &config)
            .await
            .unwrap_err();

        assert!(matches!(err, ProxyError::DialFailed { .. }));
        assert_eq!(client.len(), 10);
        assert_eq!(client[1], u8::from(Socks5ReplyCode::ConnectionRefused));
    }

    #[tokio::test]
    async fn test_connect_target_unresolvable_domain() {
        let mut client = Vec::new();
        let target = TargetAddr::domain("this-domain-does-not-exist-12345.invalid", 80);
        let err = connect_target(&mut client, &target, &SocksConfig::default())
            .await
            .unwrap_err();

        match err {
            ProxyError::DialFailed { target, .. } => {
                assert_eq!(target, "this-domain-does-not-exist-12345.invalid:80");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(client.is_empty());
    }
}
