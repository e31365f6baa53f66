//! SOCKS5 method negotiation
//!
//! Only "no authentication" is supported, and only when it is the single
//! method the client offers.

use super::codec::{read_greeting_header, read_methods, write_method_reply};
use super::consts::*;
use crate::config::SocksConfig;
use crate::error::{ProxyError, Socks5Error};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::debug;

/// Consume the greeting and answer it
///
/// ```text
/// +----+----------+----------+
/// |VER | NMETHODS | METHODS  |
/// +----+----------+----------+
/// | 1  |    1     | 1 to 255 |
/// +----+----------+----------+
/// ```
///
/// A wrong version aborts before the method list is read, with no reply.
/// A method set other than exactly `[0x00]` is rejected; the `05 FF`
/// refusal is only written when `reply_on_error` is set.
///
/// Returns the selected method byte.
pub async fn negotiate<S>(stream: &mut S, config: &SocksConfig) -> Result<u8, ProxyError>
where
    S: AsyncBufRead + AsyncWrite + Unpin,
{
    let (version, num_methods) = read_greeting_header(stream).await?;
    if version != SOCKS5_VERSION {
        return Err(Socks5Error::UnsupportedVersion(version).into());
    }

    let methods = read_methods(stream, num_methods).await?;
    debug!("Client offered methods: {:?}", methods.as_bytes());

    if !methods.is_no_auth_only() {
        if config.reply_on_error {
            write_method_reply(stream, SOCKS5_AUTH_METHOD_NOT_ACCEPTABLE).await?;
        }
        return Err(Socks5Error::MethodNotSupported(methods.into_bytes()).into());
    }

    write_method_reply(stream, SOCKS5_AUTH_METHOD_NONE).await?;
    Ok(SOCKS5_AUTH_METHOD_NONE)
}
