use clap::Parser;
use lib_predict::configs::TcpConnectionConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "predict_submit.conf";

#[derive(Parser, Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[clap(about = "Streams examples to a prediction daemon and prints its answers", version)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[clap(long, env = "PREDICT_HOST", help = "Host of the prediction daemon.")]
    pub host: Option<String>,

    #[clap(long, env = "PREDICT_PORT", help = "Port of the prediction daemon.")]
    pub port: Option<u16>,

    #[clap(long, env = "PREDICT_CONFIG_PATH", help = "Path to the JSON configuration file.")]
    pub config_path: Option<PathBuf>,

    #[clap(long, env = "PREDICT_INPUT", help = "File with one example per line. Reads stdin when unset.")]
    pub input: Option<PathBuf>,

    #[clap(long, env = "PREDICT_LOG_DIR", help = "Directory for log files. Console only when unset.")]
    pub log_dir: Option<PathBuf>,

    #[clap(long, env = "PREDICT_LOG_LEVEL", help = "Logging level (trace, debug, info, warn, error, off).")]
    pub log_level: Option<String>,

    #[clap(long, env = "PREDICT_CONNECT_TIMEOUT_MS", help = "Timeout in milliseconds for connecting to the daemon.")]
    pub connect_timeout_ms: Option<u64>,

    #[clap(long, env = "PREDICT_READ_TIMEOUT_MS", help = "Timeout in milliseconds for a single prediction read.")]
    pub read_timeout_ms: Option<u64>,

    #[clap(long, env = "PREDICT_NODELAY", help = "Disable Nagle's algorithm on the socket (true or false).")]
    pub nodelay: Option<bool>,
}

impl Config {
    // 'other' wins wherever it has a value
    fn merge(self, other: Config) -> Config {
        Config {
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            config_path: other.config_path.or(self.config_path),
            input: other.input.or(self.input),
            log_dir: other.log_dir.or(self.log_dir),
            log_level: other.log_level.or(self.log_level),
            connect_timeout_ms: other.connect_timeout_ms.or(self.connect_timeout_ms),
            read_timeout_ms: other.read_timeout_ms.or(self.read_timeout_ms),
            nodelay: other.nodelay.or(self.nodelay),
        }
    }

    /// Connection settings for the library, validated.
    pub fn to_connection_config(&self) -> Result<TcpConnectionConfig, lib_predict::configs::ConfigError> {
        let defaults = TcpConnectionConfig::default();
        let connection = TcpConnectionConfig {
            host: self.host.clone().unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            connect_timeout_ms: self.connect_timeout_ms.or(defaults.connect_timeout_ms),
            read_timeout_ms: self.read_timeout_ms.or(defaults.read_timeout_ms),
            nodelay: self.nodelay.unwrap_or(defaults.nodelay),
        };
        connection.validate()?;
        Ok(connection)
    }
}

fn defaults() -> Config {
    let connection = TcpConnectionConfig::default();
    Config {
        host: Some(connection.host),
        port: Some(connection.port),
        log_level: Some("info".to_string()),
        connect_timeout_ms: connection.connect_timeout_ms,
        read_timeout_ms: connection.read_timeout_ms,
        nodelay: Some(connection.nodelay),
        ..Default::default()
    }
}

/// Something worth logging about where the configuration came from.
///
/// Configuration is resolved before the logger exists, so these are handed
/// back to the caller instead of being logged on the spot.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigNote {
    pub level: log::Level,
    pub message: String,
}

impl ConfigNote {
    fn new(level: log::Level, message: String) -> Self {
        Self { level, message }
    }
}

/// Defaults, then the JSON file, then environment variables and CLI arguments.
pub fn load_config() -> (Config, Vec<ConfigNote>) {
    resolve(Config::parse())
}

pub fn resolve(cli_args: Config) -> (Config, Vec<ConfigNote>) {
    let config_file_path = cli_args
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let mut current_config = defaults();
    let mut notes = Vec::new();

    if config_file_path.exists() {
        match fs::read_to_string(&config_file_path) {
            Ok(config_str) => match serde_json::from_str::<Config>(&config_str) {
                Ok(file_config) => current_config = current_config.merge(file_config),
                Err(e) => notes.push(ConfigNote::new(
                    log::Level::Warn,
                    format!(
                        "Failed to parse config file {}: {}. Falling back to other sources.",
                        config_file_path.display(),
                        e
                    ),
                )),
            },
            Err(e) => notes.push(ConfigNote::new(
                log::Level::Warn,
                format!(
                    "Failed to read config file {}: {}. Falling back to other sources.",
                    config_file_path.display(),
                    e
                ),
            )),
        }
    } else {
        notes.push(ConfigNote::new(
            log::Level::Info,
            format!(
                "Config file not found at {}. Using defaults and environment/CLI variables.",
                config_file_path.display()
            ),
        ));
    }

    (current_config.merge(cli_args), notes)
}
