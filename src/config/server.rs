//! Listener and upstream configuration types.
//!
//! Default values are sourced from `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ADDRESS, DEFAULT_PORT, DEFAULT_UPSTREAM_PORT, DEFAULT_UPSTREAM_TIMEOUT_SECS,
};
use crate::error::ErrorStatusMode;

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_upstream_port() -> u16 {
    DEFAULT_UPSTREAM_PORT
}

fn default_upstream_timeout() -> u64 {
    DEFAULT_UPSTREAM_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Status mapping for rejected requests (default: legacy, always 500)
    #[serde(default)]
    pub error_status: ErrorStatusMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            error_status: ErrorStatusMode::default(),
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// The imgproxy instance rewritten requests are forwarded to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub host: String,
    #[serde(default = "default_upstream_port")]
    pub port: u16,
    /// Connect over TLS, using `host` as SNI
    #[serde(default)]
    pub tls: bool,
    /// Connect, read and write timeout in seconds (default: 30)
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}
