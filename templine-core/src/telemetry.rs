//! Tracing setup for the front-ends.
//!
//! Filters come from `RUST_LOG`, defaulting to `info`. The CLI logs to stderr;
//! the TUI owns the terminal and logs to a file instead.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a compact stderr subscriber.
///
/// Returns `false` if a global subscriber was already set.
pub fn init_stderr() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}

/// Install a subscriber appending to `path`, creating parent directories.
pub fn init_file(path: &Path) -> std::io::Result<bool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file: File = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .is_ok())
}

/// `<cache_dir>/templine/templine.log`, falling back to the working directory.
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("templine")
        .join("templine.log")
}
