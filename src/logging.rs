//! File logging for the recwave CLI.
//!
//! Events go to `recwave.log.<YYYY-MM-DD>` under the XDG state directory, one
//! file per day, written from a background worker so normalization threads
//! never block on disk. Stdout carries only command output.
//!
//! The filter comes from `RECWAVE_LOG`, then `RUST_LOG`, then `info`.

use anyhow::{anyhow, Context};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Base name of the rotated log files.
pub const LOG_FILE_NAME: &str = "recwave.log";

const FILTER_ENV: &str = "RECWAVE_LOG";
const DEFAULT_FILTER: &str = "info";
const RETAINED_LOG_DAYS: usize = 7;

static WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Starts the daily log file and prunes days past the retention window.
///
/// # Errors
/// - If the log directory cannot be determined or created
/// - If logging was already initialized
pub fn init_logging() -> Result<(), anyhow::Error> {
    let dir = log_dir()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, LOG_FILE_NAME));
    WRITER_GUARD
        .set(guard)
        .map_err(|_| anyhow!("Logging already initialized"))?;

    tracing_subscriber::registry()
        .with(filter())
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false),
        )
        .init();

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        dir = %dir.display(),
        "recwave logging started"
    );

    match prune_rotated_logs(&dir, RETAINED_LOG_DAYS) {
        Ok(0) => {}
        Ok(removed) => tracing::debug!("Removed {} old log files", removed),
        Err(e) => tracing::warn!("Could not prune old log files: {}", e),
    }
    Ok(())
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Directory holding the rotated log files.
///
/// `$XDG_STATE_HOME/recwave` when that is an absolute path, otherwise
/// `~/.local/state/recwave`.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn log_dir() -> Result<PathBuf, anyhow::Error> {
    resolve_log_dir(
        std::env::var_os("XDG_STATE_HOME").map(PathBuf::from),
        dirs::home_dir(),
    )
}

fn resolve_log_dir(
    state_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf, anyhow::Error> {
    // Relative XDG paths are invalid and ignored.
    if let Some(state_home) = state_home.filter(|path| path.is_absolute()) {
        return Ok(state_home.join("recwave"));
    }
    let home = home.ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(".local").join("state").join("recwave"))
}

/// Date suffix of a rotated log file name, e.g. `2026-01-31`.
fn rotation_date(file_name: &str) -> Option<&str> {
    let date = file_name.strip_prefix(LOG_FILE_NAME)?.strip_prefix('.')?;
    let well_formed = date.len() == 10
        && date.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    well_formed.then_some(date)
}

/// Rotated log files in `dir`, oldest day first.
pub(crate) fn rotated_logs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut logs: Vec<(String, PathBuf)> = fs::read_dir(dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let date = rotation_date(path.file_name()?.to_str()?)?.to_owned();
            Some((date, path))
        })
        .collect();
    logs.sort();
    Ok(logs.into_iter().map(|(_, path)| path).collect())
}

/// Deletes all but the `keep` most recent days. Returns how many were removed.
fn prune_rotated_logs(dir: &Path, keep: usize) -> io::Result<usize> {
    let logs = rotated_logs(dir)?;
    let excess = logs.len().saturating_sub(keep);

    let mut removed = 0;
    for path in &logs[..excess] {
        match fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!("Failed to delete old log file {}: {}", path.display(), e),
        }
    }
    Ok(removed)
}
