/// Installs the fern console/file logger and rotates old log files.
pub mod logger_setup;

pub use logger_setup::{cleanup_old_logs, parse_level, setup_logging, LoggerError};
