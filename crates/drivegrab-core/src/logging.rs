//! Tracing setup. Logs go to `$XDG_STATE_HOME/drivegrab/drivegrab.log`, or to
//! stderr when that file cannot be opened. `RUST_LOG` overrides the filter.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,drivegrab=debug,drivegrab_core=debug";
const LOG_FILE_NAME: &str = "drivegrab.log";

/// Where the installed subscriber writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log file location; the state directory is created if missing.
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("drivegrab")?;
    let state = dirs.get_state_home();
    fs::create_dir_all(&state)
        .with_context(|| format!("creating log directory {}", state.display()))?;
    Ok(state.join(LOG_FILE_NAME))
}

fn open_log_file() -> Result<(PathBuf, File)> {
    let path = log_file_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    Ok((path, file))
}

/// Installs the global subscriber. Call once, before anything logs.
pub fn init() -> LogTarget {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false);
    match open_log_file() {
        Ok((path, file)) => {
            builder.with_writer(Mutex::new(file)).init();
            tracing::info!("drivegrab logging to {}", path.display());
            LogTarget::File(path)
        }
        Err(e) => {
            builder.with_writer(std::io::stderr).init();
            tracing::debug!("log file unavailable, using stderr: {:#}", e);
            LogTarget::Stderr
        }
    }
}
