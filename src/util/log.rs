// src/util/log.rs

//! File-backed tracing setup. The terminal belongs to the UI, so nothing is
//! ever written to stdout or stderr once the app is running.
use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use tracing::Level;

/// `DEBUG=true` turns on debug output.
pub fn debug_enabled() -> bool {
    std::env::var("DEBUG").unwrap_or_default() == "true"
}

/// Log file for today, e.g. `./logs/talksy-2026-10-18.log`.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("talksy-{}.log", Local::now().format("%Y-%m-%d")))
}

/// Install the global subscriber. Returns the file being written to.
pub fn init(log_dir: &str) -> std::io::Result<PathBuf> {
    let log_dir = PathBuf::from(log_dir);
    create_dir_all(&log_dir)?;

    let path = log_file_path(&log_dir);
    let file = File::options().create(true).append(true).open(&path)?;

    let level = if debug_enabled() { Level::DEBUG } else { Level::INFO };

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .with_target(false)
        .try_init();

    Ok(path)
}
