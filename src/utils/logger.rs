//! File logging. The terminal belongs to the form, so log lines go to
//! `~/.stack-suggest/logs/latest.log`.

use crate::utils::config::app_dir;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub fn log_dir() -> PathBuf {
    app_dir().join("logs")
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(level: &str, debug: bool) -> String {
    let level = if debug { "debug" } else { level };
    format!("stack_suggest={},reqwest=warn", level)
}

/// Installs the global subscriber writing to `<dir>/latest.log`. Returns the
/// log file path.
pub fn init_logger_in(dir: &Path, level: &str, debug: bool) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    let path = dir.join("latest.log");
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level, debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logger already initialised: {}", e))?;

    Ok(path)
}

pub fn init_global_logger(level: &str, debug: bool) -> Result<PathBuf> {
    init_logger_in(&log_dir(), level, debug)
}
