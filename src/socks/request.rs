//! SOCKS5 request parser
//!
//! Reads the CONNECT request that follows a successful negotiation.
//! Nothing is written here; replies belong to the connector and handler.

use super::codec::{read_domain, read_ipv4, read_port, read_request_header};
use super::consts::*;
use super::types::TargetAddr;
use crate::error::{ProxyError, Socks5Error};
use tokio::io::AsyncBufRead;
use tracing::debug;

/// Parse a CONNECT request from the stream
///
/// The VER byte is read but not validated. Anything other than CONNECT
/// is rejected once the 4-byte header is in, as is an address type other
/// than IPv4 or domain name; in both cases no further bytes are consumed.
pub async fn parse_request<R>(reader: &mut R) -> Result<TargetAddr, ProxyError>
where
    R: AsyncBufRead + Unpin,
{
    let header = read_request_header(reader).await?;
    debug!(
        "Request header: ver={} cmd={} rsv={} atyp={}",
        header.version, header.command, header.reserved, header.addr_type
    );

    if header.command != SOCKS5_CMD_TCP_CONNECT {
        return Err(Socks5Error::CommandNotSupported(header.command).into());
    }

    let target = match header.addr_type {
        SOCKS5_ADDR_TYPE_IPV4 => {
            let ip = read_ipv4(reader).await?;
            TargetAddr::ipv4(ip, read_port(reader).await?)
        }
        SOCKS5_ADDR_TYPE_DOMAIN => {
            let domain = read_domain(reader).await?;
            TargetAddr::domain(domain, read_port(reader).await?)
        }
        other => return Err(Socks5Error::AddressTypeNotSupported(other).into()),
    };

    Ok(target)
}
