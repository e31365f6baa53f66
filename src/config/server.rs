//! Server configuration types

use crate::error::ProxyError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Address the proxy listens on. Not configurable.
pub const LISTEN_ADDR: &str = "127.0.0.1:9000";

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "warning", "error"];

fn default_log_level() -> String {
    "info".to_string()
}

/// Root configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,

    /// SOCKS5 behavior
    #[serde(default)]
    pub socks: SocksConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ProxyError> {
        self.log.validate()
    }
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of human readable ones
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl LogConfig {
    fn validate(&self) -> Result<(), ProxyError> {
        if LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            Ok(())
        } else {
            Err(ProxyError::Config(format!("Unknown log level: {}", self.level)))
        }
    }
}

/// SOCKS5 protocol configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct SocksConfig {
    /// Send standard negative replies on failure.
    ///
    /// Off by default: a failing cycle just closes the connection.
    #[serde(default)]
    pub reply_on_error: bool,

    /// Dial timeout in seconds, 0 disables it
    #[serde(default)]
    pub connect_timeout: u64,
}

impl SocksConfig {
    /// Dial timeout, if one is configured
    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout > 0).then(|| Duration::from_secs(self.connect_timeout))
    }
}
