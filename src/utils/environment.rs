use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR_NAME: &str = "chemvis";

/// Platform data directory for the app (e.g. `~/.local/share/chemvis`)
///
/// Falls back to `$HOME/.chemvis` when the platform has no data directory.
pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(data) = dirs::data_dir() {
        return Ok(data.join(APP_DIR_NAME));
    }
    let home = env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(format!(".{}", APP_DIR_NAME)))
}

/// Default config file location (e.g. `~/.config/chemvis/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.toml"))
}

/// Session-scoped storage directory shared by every command run from the same shell
///
/// Keyed by the parent process id so a new terminal starts signed out, the way a new browser
/// tab starts with empty `sessionStorage`.
pub fn default_session_dir() -> PathBuf {
    env::temp_dir().join(format!("{}-sessions", APP_DIR_NAME)).join(session_key())
}

#[cfg(unix)]
fn session_key() -> String {
    std::os::unix::process::parent_id().to_string()
}

#[cfg(not(unix))]
fn session_key() -> String {
    std::process::id().to_string()
}

/// Where exported reports land when not configured: the downloads folder, else the cwd
pub fn default_report_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
