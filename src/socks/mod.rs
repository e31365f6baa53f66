//! SOCKS5 module for Minisocks
//!
//! Implements the no-auth CONNECT subset of SOCKS5 on top of any
//! async byte stream.

mod codec;
mod connector;
mod consts;
mod handler;
mod negotiate;
mod relay;
mod request;
mod types;

pub use connector::connect_target;
pub use consts::*;
pub use handler::handle_connection;
pub use negotiate::negotiate;
pub use relay::RelaySession;
pub use request::parse_request;
pub use types::{AddressSpec, HandshakeStage, MethodSet, TargetAddr};
