use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable that turns on file logging and sets its filter
pub const LOG_ENV: &str = "THINKTYPE_LOG";

/// Install a file-backed tracing subscriber.
///
/// The terminal belongs to the TUI, so nothing is logged unless `debug` is
/// set or `THINKTYPE_LOG` is present. Returns whether a subscriber was
/// installed.
pub fn init_tracing(debug: bool, log_path: Option<&Path>) -> std::io::Result<bool> {
    let env_filter = std::env::var(LOG_ENV).ok();
    if !debug && env_filter.is_none() {
        return Ok(false);
    }
    let Some(path) = log_path else {
        return Ok(false);
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = match env_filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new("thinktype=debug"),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .is_ok();

    Ok(installed)
}
