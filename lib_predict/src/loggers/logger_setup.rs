use std::fs;
use std::path::{Path, PathBuf};

use colored::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("A logger is already installed: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

/// Maps a level name to a filter. Unknown names fall back to `Info`.
pub fn parse_level(log_level: &str) -> log::LevelFilter {
    match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        "off" => log::LevelFilter::Off,
        _ => log::LevelFilter::Info,
    }
}

fn colored_level(level: log::Level) -> ColoredString {
    let name = level.to_string();
    match level {
        log::Level::Error => name.bright_red(),
        log::Level::Warn => name.bright_yellow(),
        log::Level::Info => name.bright_green(),
        log::Level::Debug => name.bright_white(),
        log::Level::Trace => name.bright_cyan(),
    }
}

/// Installs the global logger: coloured lines on stderr and, when `log_dir`
/// is given, plain lines in `<app_name>_<timestamp>.log` inside it.
///
/// Stdout is left alone so predictions can be piped. Returns the path of the
/// log file, if one was opened.
pub fn setup_logging(
    app_name: &str,
    log_dir: Option<&Path>,
    log_level: &str,
) -> Result<Option<PathBuf>, LoggerError> {
    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]").to_string().truecolor(128, 128, 128),
                record.target(),
                colored_level(record.level()),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new().level(parse_level(log_level)).chain(console);

    let mut log_path = None;
    if let Some(dir) = log_dir {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        // Keep only the most recent previous log next to the new one.
        cleanup_old_logs(dir, app_name)?;

        let file_name = format!("{}_{}.log", app_name, chrono::Local::now().format("%Y-%m-%d_%H-%M-%S"));
        let path = dir.join(file_name);

        let file = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{}[{}][{}] {}",
                    chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                    record.target(),
                    record.level(),
                    message
                ))
            })
            .chain(fern::log_file(&path)?);

        dispatch = dispatch.chain(file);
        log_path = Some(path);
    }

    dispatch.apply()?;
    Ok(log_path)
}

/// Deletes every `<app_name>_*.log` in `log_dir` except the newest one.
pub fn cleanup_old_logs(log_dir: &Path, app_name: &str) -> Result<(), LoggerError> {
    let prefix = format!("{}_", app_name);
    let mut entries: Vec<_> = fs::read_dir(log_dir)?
        .filter_map(|res| res.ok())
        .filter(|e| {
            let path = e.path();
            path.extension().map_or(false, |ext| ext == "log")
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, |n| n.starts_with(&prefix))
        })
        .collect();

    // Timestamps in the names sort chronologically; newest first.
    entries.sort_by_key(|e| std::cmp::Reverse(e.file_name()));

    for entry in entries.iter().skip(1) {
        if let Err(e) = fs::remove_file(entry.path()) {
            eprintln!("Failed to delete old log file {:?}: {}", entry.path(), e);
        }
    }

    Ok(())
}
