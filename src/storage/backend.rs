//! Settings store abstraction.
//!
//! The session treats persisted settings as an opaque sink: it hands over a
//! complete [`Settings`] value and never reads the file itself.

use crate::domain::error::Result;
use crate::storage::models::Settings;

/// Where settings are loaded from and saved to.
///
/// # Implementations
///
/// - [`TomlSettingsStore`](crate::storage::TomlSettingsStore): TOML file with atomic writes
/// - [`MemorySettingsStore`]: in-memory, for tests and ephemeral runs
pub trait SettingsStore: Send {
    /// Loads the current settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read or parsed.
    fn load(&mut self) -> Result<Settings>;

    /// Replaces the stored settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. The previous contents are left
    /// intact.
    fn save(&mut self, settings: &Settings) -> Result<()>;
}

/// Keeps settings in memory and counts saves.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    settings: Settings,
    saves: usize,
}

impl MemorySettingsStore {
    #[must_use]
    pub const fn new(settings: Settings) -> Self {
        Self { settings, saves: 0 }
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub const fn save_count(&self) -> usize {
        self.saves
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&mut self) -> Result<Settings> {
        Ok(self.settings.clone())
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        self.settings = settings.clone();
        self.saves += 1;
        Ok(())
    }
}
