//! Log stream setup.
//!
//! Library code logs through the `log` facade. The binary points it at an
//! append-only file where every line carries a local timestamp, so the log
//! outlives individual runs and survives a crash after the report is written.

use crate::config::LogSettings;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("Could not open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("A logger is already installed: {0}")]
    AlreadyInstalled(#[from] log::SetLoggerError),
}

/// Installs the global logger, appending to the configured file.
///
/// Level defaults to `info` and can be changed with `RUST_LOG`.
pub fn init(settings: &LogSettings) -> Result<(), LogInitError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.path)
        .map_err(|e| LogInitError::Open {
            path: settings.path.clone(),
            source: e,
        })?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                record.args()
            )
        })
        .try_init()?;

    Ok(())
}
