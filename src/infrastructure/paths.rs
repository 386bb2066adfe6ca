//! Platform locations for settings, logs and traces.
//!
//! Settings live under the platform configuration directory
//! (`~/.config/dashview` on Linux), logs and trace exports under the local
//! data directory (`~/.local/share/dashview`).

use crate::domain::error::{Result, ViewerError};
use std::path::PathBuf;

/// Directory name used under each platform base directory.
pub const APP_DIR: &str = "dashview";

/// Returns the directory holding `settings.toml`.
///
/// # Errors
///
/// Returns [`ViewerError::Config`] if the platform has no configuration
/// directory.
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| ViewerError::Config("no configuration directory on this platform".to_string()))
}

/// Returns the directory holding the log file and trace exports.
///
/// # Errors
///
/// Returns [`ViewerError::Config`] if the platform has no data directory.
pub fn data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| ViewerError::Config("no data directory on this platform".to_string()))
}

/// Settings file name inside [`config_dir`].
pub const SETTINGS_FILE: &str = "settings.toml";

/// Log file name inside [`data_dir`].
pub const LOG_FILE: &str = "dashview.log";

/// Span export file name inside [`data_dir`].
pub const TRACE_FILE: &str = "dashview-otlp.json";

/// Default settings file.
///
/// # Errors
///
/// See [`config_dir`].
pub fn settings_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(SETTINGS_FILE))
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a tilde, and every path when no home directory is known,
/// are returned unchanged.
///
/// # Examples
///
/// ```
/// use dashview::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/etc/dashview.toml").to_str(), Some("/etc/dashview.toml"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}
