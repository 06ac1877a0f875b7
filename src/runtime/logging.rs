use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_log_path};

/// Route `tracing` output to the log file; the terminal belongs to the UI.
///
/// `RUST_LOG` takes precedence over `logging.level`. Returns the file in use.
pub fn init(settings: &LoggingSettings) -> Result<PathBuf, String> {
    let path = settings
        .file
        .clone()
        .or_else(default_log_path)
        .ok_or_else(|| "no log file configured and HOME is not set".to_string())?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("{}: {e}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| format!("{}: {e}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok(path)
}
