//! # Configuration Modules
//!
//! Serde-backed settings for reaching the prediction daemon.

/// Connection settings for the TCP factory.
pub mod config_tcp;

pub use config_tcp::{ConfigError, TcpConnectionConfig};
