//! Infrastructure layer for filesystem and desktop interactions.
//!
//! - [`paths`]: Platform directories for settings, logs and traces
//! - [`terminal`]: Opening a command in a new terminal window

pub mod paths;
pub mod terminal;

pub use paths::{config_dir, data_dir, expand_tilde, settings_path};
