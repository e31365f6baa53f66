//! Error types for Minisocks
//!
//! Every error is local to one connection cycle. `Socks5Error` covers
//! protocol violations, `ProxyError` wraps everything a cycle can fail with.

use std::io;
use thiserror::Error;

/// Main error type for a connection cycle
#[derive(Error, Debug)]
pub enum ProxyError {
    /// IO error on the client stream (short read, read or write failure)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Outbound connection to the requested target failed
    #[error("Dial to {target} failed: {source}")]
    DialFailed {
        /// The `host:port` the connector tried to reach
        target: String,
        /// Underlying error from the dial
        #[source]
        source: io::Error,
    },

    /// SOCKS5 protocol error
    #[error("SOCKS5 error: {0}")]
    Socks5(#[from] Socks5Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// SOCKS5 specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Socks5Error {
    /// Unsupported SOCKS version
    #[error("Unsupported SOCKS version: {0}")]
    UnsupportedVersion(u8),

    /// Offered method set is not exactly {no authentication}
    #[error("Authentication methods not supported: {0:?}")]
    MethodNotSupported(Vec<u8>),

    /// Command not supported
    #[error("Command not supported: {0}")]
    CommandNotSupported(u8),

    /// Address type not supported
    #[error("Address type not supported: {0}")]
    AddressTypeNotSupported(u8),

    /// Invalid domain name
    #[error("Invalid domain name: {0}")]
    InvalidDomain(String),
}

/// Reply codes for SOCKS5 protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Socks5ReplyCode {
    /// Command succeeded
    Succeeded = 0x00,
    /// General SOCKS server failure
    GeneralFailure = 0x01,
    /// Connection not allowed by ruleset
    ConnectionNotAllowed = 0x02,
    /// Network unreachable
    NetworkUnreachable = 0x03,
    /// Host unreachable
    HostUnreachable = 0x04,
    /// Connection refused
    ConnectionRefused = 0x05,
    /// TTL expired
    TtlExpired = 0x06,
    /// Command not supported
    CommandNotSupported = 0x07,
    /// Address type not supported
    AddressTypeNotSupported = 0x08,
}

impl From<Socks5ReplyCode> for u8 {
    fn from(code: Socks5ReplyCode) -> Self {
        code as u8
    }
}

impl From<&io::Error> for Socks5ReplyCode {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Socks5ReplyCode::ConnectionRefused,
            io::ErrorKind::TimedOut => Socks5ReplyCode::HostUnreachable,
            io::ErrorKind::AddrNotAvailable => Socks5ReplyCode::HostUnreachable,
            io::ErrorKind::PermissionDenied => Socks5ReplyCode::ConnectionNotAllowed,
            _ => Socks5ReplyCode::GeneralFailure,
        }
    }
}

impl Socks5Error {
    /// Negative reply matching this error, if the request stage has one
    ///
    /// Version and method errors happen before a request exists, so they
    /// have no request-level reply code.
    pub fn reply_code(&self) -> Option<Socks5ReplyCode> {
        match self {
            Socks5Error::CommandNotSupported(_) => Some(Socks5ReplyCode::CommandNotSupported),
            Socks5Error::AddressTypeNotSupported(_) => {
                Some(Socks5ReplyCode::AddressTypeNotSupported)
            }
            Socks5Error::InvalidDomain(_) => Some(Socks5ReplyCode::GeneralFailure),
            Socks5Error::UnsupportedVersion(_) | Socks5Error::MethodNotSupported(_) => None,
        }
    }
}
