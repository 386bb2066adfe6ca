//! Persistence of viewer settings.
//!
//! # Modules
//!
//! - `backend`: The [`SettingsStore`] trait and an in-memory store
//! - `file`: TOML file store with atomic writes
//! - `models`: The persisted [`Settings`] shape and its defaults

pub mod backend;
pub mod file;
pub mod models;

pub use backend::{MemorySettingsStore, SettingsStore};
pub use file::TomlSettingsStore;
pub use models::{Settings, WindowGeometry, DEFAULT_CLEAR_DELAY_SECS};
