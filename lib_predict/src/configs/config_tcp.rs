use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::connections::tcp::{TcpConnectionFactory, DEFAULT_PORT};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid daemon address: {0}")]
    InvalidAddress(String),
}

/// # TCP Connection Config
///
/// Where the prediction daemon listens and how sockets to it are tuned.
/// Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TcpConnectionConfig {
    pub host: String,
    pub port: u16,
    pub connect_timeout_ms: Option<u64>,
    /// Unset means reads block until the daemon answers or closes.
    pub read_timeout_ms: Option<u64>,
    pub nodelay: bool,
}

impl Default for TcpConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            connect_timeout_ms: Some(5000),
            read_timeout_ms: None,
            nodelay: true,
        }
    }
}

impl TcpConnectionConfig {
    /// Loads and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: TcpConnectionConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidAddress("host is empty".to_string()));
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidAddress(format!("{}:0 has no port", self.host)));
        }
        Ok(())
    }

    /// Builds the factory described by this configuration.
    pub fn to_factory(&self) -> TcpConnectionFactory {
        let mut factory = TcpConnectionFactory::new(self.host.clone(), self.port).with_nodelay(self.nodelay);
        if let Some(ms) = self.connect_timeout_ms {
            factory = factory.with_connect_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.read_timeout_ms {
            factory = factory.with_read_timeout(Duration::from_millis(ms));
        }
        factory
    }
}
