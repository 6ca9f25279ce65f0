// Gateway Configuration
// Ports, paths and limits for the signaling service

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid configuration values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("HTTP and secure ports must differ (both {0})")]
    PortClash(u16),

    #[error("max_peers cannot be 0")]
    ZeroMaxPeers,

    #[error("Signaling path must start with '/': {0:?}")]
    InvalidPath(String),
}

/// Configuration for the signaling gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Address both listeners bind to
    pub bind_address: String,
    /// Plain HTTP port; every request is redirected to the secure port
    pub http_port: u16,
    /// Port serving signaling and the peer query
    pub secure_port: u16,
    /// Mount point of the signaling socket
    pub signaling_path: String,
    /// Maximum simultaneously registered peers
    pub max_peers: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            http_port: 3333,
            secure_port: 3334,
            signaling_path: "/peerjs".to_string(),
            max_peers: 1000,
        }
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bind_address(mut self, addr: &str) -> Self {
        self.bind_address = addr.to_string();
        self
    }

    pub fn with_http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    pub fn with_secure_port(mut self, port: u16) -> Self {
        self.secure_port = port;
        self
    }

    pub fn with_signaling_path(mut self, path: &str) -> Self {
        self.signaling_path = path.to_string();
        self
    }

    pub fn with_max_peers(mut self, max: usize) -> Self {
        self.max_peers = max;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Port 0 asks the OS for an ephemeral port, so two zeros never clash.
        if self.http_port != 0 && self.http_port == self.secure_port {
            return Err(ConfigError::PortClash(self.http_port));
        }
        if self.max_peers == 0 {
            return Err(ConfigError::ZeroMaxPeers);
        }
        if !self.signaling_path.starts_with('/') || self.signaling_path.len() < 2 {
            return Err(ConfigError::InvalidPath(self.signaling_path.clone()));
        }
        Ok(())
    }

    pub fn http_bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.http_port)
    }

    pub fn secure_bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.secure_port)
    }
}
