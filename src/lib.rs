//! # Minisocks - Minimal SOCKS5 Proxy
//!
//! Minisocks speaks the no-authentication CONNECT subset of SOCKS5. It
//! negotiates the method, reads an IPv4 or domain-name target, dials it,
//! and relays bytes both ways until either side closes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use minisocks::{run_server, Config};
//! use tokio::sync::broadcast;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
//!     run_server(Config::default(), shutdown_rx).await
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! accept loop -> handle_connection -> negotiate -> parse_request
//!             -> connect_target -> RelaySession
//! ```
//!
//! [`socks::handle_connection`] works on any `AsyncRead + AsyncWrite`
//! stream, so the protocol core can be driven without a listener.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod server;
pub mod socks;

// Re-export commonly used items
pub use config::{load_config, Config, LISTEN_ADDR};
pub use error::{ProxyError, Socks5Error};
pub use server::{run_server, serve};

/// Version of the Minisocks library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the application
pub const NAME: &str = env!("CARGO_PKG_NAME");
