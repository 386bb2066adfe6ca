//! TOML settings file.
//!
//! Writes go to a sibling temporary file which is then renamed over the
//! target, so a crash mid-write never leaves a truncated settings file.

use crate::domain::error::{Result, ViewerError};
use crate::storage::backend::SettingsStore;
use crate::storage::models::Settings;
use std::path::{Path, PathBuf};

/// Settings persisted as a TOML document.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    file_path: PathBuf,
}

impl TomlSettingsStore {
    /// Opens the store at `file_path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing settings store");
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { file_path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read(&self) -> Result<Settings> {
        let contents = std::fs::read_to_string(&self.file_path)?;
        let settings: Settings = toml::from_str(&contents)
            .map_err(|e| ViewerError::Storage(format!("failed to parse settings: {e}")))?;
        tracing::debug!(
            delay_secs = settings.clipboard_clear_delay_seconds,
            history_len = settings.search_history.len(),
            "loaded settings"
        );
        Ok(settings)
    }

    fn write(&self, settings: &Settings) -> Result<()> {
        let body = toml::to_string_pretty(settings)
            .map_err(|e| ViewerError::Storage(format!("failed to serialize settings: {e}")))?;

        let tmp_path = self.file_path.with_extension("toml.tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, body)?;
        std::fs::rename(&tmp_path, &self.file_path)?;
        Ok(())
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load(&mut self) -> Result<Settings> {
        let _span = tracing::debug_span!("settings_load", path = ?self.file_path).entered();

        if self.file_path.exists() {
            return self.read();
        }

        let defaults = Settings::default();
        self.write(&defaults)?;
        tracing::info!(path = ?self.file_path, "created default settings file");
        Ok(defaults)
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        let _span = tracing::debug_span!("settings_save", path = ?self.file_path).entered();
        self.write(settings)?;
        tracing::debug!("settings saved");
        Ok(())
    }
}
