//! SOCKS5 wire codec
//!
//! Stateless readers and writers for the fixed-format fields of the
//! handshake. Readers take a buffered stream so that every stage of a
//! cycle reads through the same buffer.
//!
//! # Request Format
//!
//! ```text
//! +----+-----+-------+------+----------+----------+
//! |VER | CMD |  RSV  | ATYP | DST.ADDR | DST.PORT |
//! +----+-----+-------+------+----------+----------+
//! | 1  |  1  | X'00' |  1   | Variable |    2     |
//! +----+-----+-------+------+----------+----------+
//! ```

use super::consts::*;
use super::types::MethodSet;
use crate::error::{ProxyError, Socks5Error, Socks5ReplyCode};
use std::io;
use std::net::Ipv4Addr;
use tokio::io::{AsyncBufRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Fixed 4-byte header of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestHeader {
    /// VER
    pub version: u8,
    /// CMD
    pub command: u8,
    /// RSV
    pub reserved: u8,
    /// ATYP
    pub addr_type: u8,
}

/// Read `VER | NMETHODS` of a greeting
pub async fn read_greeting_header<R>(reader: &mut R) -> io::Result<(u8, u8)>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf).await?;
    Ok((buf[0], buf[1]))
}

/// Read exactly `count` method identifiers
pub async fn read_methods<R>(reader: &mut R, count: u8) -> io::Result<MethodSet>
where
    R: AsyncBufRead + Unpin,
{
    let mut methods = vec![0u8; count as usize];
    reader.read_exact(&mut methods).await?;
    Ok(MethodSet::new(methods))
}

/// Read `VER | CMD | RSV | ATYP`
pub async fn read_request_header<R>(reader: &mut R) -> io::Result<RequestHeader>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).await?;
    Ok(RequestHeader {
        version: buf[0],
        command: buf[1],
        reserved: buf[2],
        addr_type: buf[3],
    })
}

/// Read a 4-byte IPv4 address
pub async fn read_ipv4<R>(reader: &mut R) -> io::Result<Ipv4Addr>
where
    R: AsyncBufRead + Unpin,
{
    let mut octets = [0u8; 4];
    reader.read_exact(&mut octets).await?;
    Ok(Ipv4Addr::from(octets))
}

/// Read a length-prefixed domain name
pub async fn read_domain<R>(reader: &mut R) -> Result<String, ProxyError>
where
    R: AsyncBufRead + Unpin,
{
    let len = reader.read_u8().await? as usize;
    if len == 0 {
        return Err(Socks5Error::InvalidDomain("empty domain name".to_string()).into());
    }

    let mut domain = vec![0u8; len];
    reader.read_exact(&mut domain).await?;

    String::from_utf8(domain).map_err(|e| {
        Socks5Error::InvalidDomain(String::from_utf8_lossy(e.as_bytes()).into_owned()).into()
    })
}

/// Read a big-endian port
pub async fn read_port<R>(reader: &mut R) -> io::Result<u16>
where
    R: AsyncBufRead + Unpin,
{
    reader.read_u16().await
}

/// Write the 2-byte method selection reply
pub async fn write_method_reply<W>(writer: &mut W, method: u8) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&[SOCKS5_VERSION, method]).await?;
    writer.flush().await
}

/// Write a request reply
///
/// The bound address is always reported as 0.0.0.0:0, since a CONNECT
/// relay has no meaningful bound socket on the proxy side.
pub async fn write_reply<W>(writer: &mut W, code: Socks5ReplyCode) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&reply_bytes(code)).await?;
    writer.flush().await
}

fn reply_bytes(code: Socks5ReplyCode) -> [u8; SOCKS5_IPV4_REPLY_LEN] {
    [
        SOCKS5_VERSION,
        code.into(),
        SOCKS5_RESERVED,
        SOCKS5_ADDR_TYPE_IPV4,
        0,
        0,
        0,
        0,
        0,
        0,
    ]
}
