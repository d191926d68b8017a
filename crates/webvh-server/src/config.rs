//! Server configuration.

use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address '{0}': {1}")]
    InvalidBindAddr(String, std::net::AddrParseError),
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `WEBVH_BIND_ADDR` (default: `127.0.0.1:8080`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_bind_addr(std::env::var("WEBVH_BIND_ADDR").ok().as_deref())
    }

    fn from_bind_addr(raw: Option<&str>) -> Result<Self, ConfigError> {
        let raw = raw.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = raw
            .parse()
            .map_err(|e| ConfigError::InvalidBindAddr(raw.to_string(), e))?;
        Ok(Self { bind_addr })
    }
}
