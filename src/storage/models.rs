//! Persisted settings.
//!
//! The on-disk form is a TOML document:
//!
//! ```toml
//! clipboard_clear_delay_seconds = 30
//! search_history = ["bank", "mail"]
//!
//! [window]
//! x = 0
//! y = 0
//! width = 600
//! height = 500
//! ```
//!
//! Missing keys fall back to their defaults so older or hand-edited files keep
//! loading.

use serde::{Deserialize, Serialize};

/// Default clipboard countdown in seconds.
pub const DEFAULT_CLEAR_DELAY_SECS: u64 = 30;

/// Everything the viewer remembers between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How long a copied secret stays on the clipboard.
    pub clipboard_clear_delay_seconds: u64,

    /// Successful searches, most recent first.
    pub search_history: Vec<String>,

    /// Last window placement. The terminal front-end never reads or moves
    /// it; it is carried through every save unchanged so a file shared with
    /// a windowed front-end keeps its geometry.
    pub window: WindowGeometry,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            clipboard_clear_delay_seconds: DEFAULT_CLEAR_DELAY_SECS,
            search_history: Vec::new(),
            window: WindowGeometry::default(),
        }
    }
}

/// Position and size of a desktop window, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 600,
            height: 500,
        }
    }
}
