//! SOCKS5 type definitions
//!
//! Defines the core types that flow between the handshake stages.

use super::consts::*;
use std::fmt;
use std::net::Ipv4Addr;

/// Destination address of a CONNECT request, without the port
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSpec {
    /// IPv4 literal
    Ipv4(Ipv4Addr),
    /// Domain name, 1..=255 bytes
    Domain(String),
}

impl fmt::Display for AddressSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressSpec::Ipv4(ip) => write!(f, "{}", ip),
            AddressSpec::Domain(domain) => write!(f, "{}", domain),
        }
    }
}

/// Target of a CONNECT request
///
/// Built once by the request parser and consumed by the connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetAddr {
    /// Host part
    pub addr: AddressSpec,
    /// Port in host byte order
    pub port: u16,
}

impl TargetAddr {
    /// Create a TargetAddr from an IPv4 address and port
    pub fn ipv4(ip: Ipv4Addr, port: u16) -> Self {
        TargetAddr {
            addr: AddressSpec::Ipv4(ip),
            port,
        }
    }

    /// Create a TargetAddr from a domain name and port
    pub fn domain(domain: impl Into<String>, port: u16) -> Self {
        TargetAddr {
            addr: AddressSpec::Domain(domain.into()),
            port,
        }
    }

    /// Dial string in `host:port` form
    pub fn dial_target(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TargetAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

/// Offered authentication methods, in the order the client sent them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSet(Vec<u8>);

impl MethodSet {
    /// Wrap the raw method bytes of a greeting
    pub fn new(methods: Vec<u8>) -> Self {
        MethodSet(methods)
    }

    /// True only for the singleton {no authentication}
    pub fn is_no_auth_only(&self) -> bool {
        self.0.as_slice() == [SOCKS5_AUTH_METHOD_NONE]
    }

    /// Raw method bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the set, returning the raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Progress of one connection cycle. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandshakeStage {
    /// Waiting for the method greeting
    Greeting,
    /// A method was accepted
    Negotiated,
    /// The CONNECT request was read
    RequestParsed,
    /// The target is dialed and the success reply sent
    Connected,
    /// Bytes are flowing in both directions
    Relaying,
    /// Cycle finished
    Done,
}

impl fmt::Display for HandshakeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandshakeStage::Greeting => "greeting",
            HandshakeStage::Negotiated => "negotiated",
            HandshakeStage::RequestParsed => "request-parsed",
            HandshakeStage::Connected => "connected",
            HandshakeStage::Relaying => "relaying",
            HandshakeStage::Done => "done",
        };
        f.write_str(name)
    }
}
