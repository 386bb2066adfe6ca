//! Theme management and ANSI escape sequence generation.
//!
//! Colors are hex strings turned into 24-bit ANSI sequences at render time.
//! The default theme uses the Dashlane palette tuned for dark terminals;
//! `dashlane-light` is bundled for light ones, and any theme can be loaded
//! from a TOML file.
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#FFFFFF"
//! header_bg = "#02333D"
//! selection_fg = "#FFFFFF"
//! selection_bg = "#00A5FF"
//! text_normal = "#F8F8F8"
//! text_dim = "#9AA5A8"
//! border = "#02333D"
//! search_bar_border = "#00A5FF"
//! match_highlight_fg = "#02333D"
//! match_highlight_bg = "#00A5FF"
//! prompt_fg = "#00A5FF"
//! status_info = "#FFFFFF"
//! status_warn = "#F39C12"
//! status_error = "#E74C3C"
//! secret_fg = "#00A5FF"
//! ```

use crate::domain::error::{Result, ViewerError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the built-in default theme.
pub const DEFAULT_THEME: &str = "dashlane";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Row whose details are open.
    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Footer and secondary text.
    pub text_dim: String,

    pub border: String,

    pub search_bar_border: String,
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    /// Login and tool-missing prompts.
    pub prompt_fg: String,

    pub status_info: String,
    pub status_warn: String,
    pub status_error: String,

    /// Revealed or masked password in the details panel.
    pub secret_fg: String,
}

impl Theme {
    /// The Dashlane palette for dark terminals.
    #[must_use]
    pub fn dashlane() -> Self {
        let hex = str::to_string;
        Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors {
                header_fg: hex("#FFFFFF"),
                header_bg: Some(hex("#02333D")),
                selection_fg: hex("#FFFFFF"),
                selection_bg: hex("#00A5FF"),
                text_normal: hex("#F8F8F8"),
                text_dim: hex("#9AA5A8"),
                border: hex("#02333D"),
                search_bar_border: hex("#00A5FF"),
                match_highlight_fg: hex("#02333D"),
                match_highlight_bg: hex("#00A5FF"),
                prompt_fg: hex("#00A5FF"),
                status_info: hex("#FFFFFF"),
                status_warn: hex("#F39C12"),
                status_error: hex("#E74C3C"),
                secret_fg: hex("#00A5FF"),
            },
        }
    }

    /// Loads a built-in theme by name: `dashlane` or `dashlane-light`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            DEFAULT_THEME => Some(Self::dashlane()),
            "dashlane-light" => {
                toml::from_str(include_str!("../../themes/dashlane-light.toml")).ok()
            }
            _ => None,
        }
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Theme`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ViewerError::Theme(format!("failed to read theme file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| ViewerError::Theme(format!("failed to parse theme TOML: {e}")))
    }

    /// Converts a hex color to RGB, falling back to white on malformed input.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim().trim_start_matches('#');

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
        (channel(0..2), channel(2..4), channel(4..6))
    }

    /// 24-bit foreground color sequence.
    ///
    /// ```
    /// use dashview::ui::Theme;
    ///
    /// assert_eq!(Theme::fg("#00A5FF"), "\u{1b}[38;2;0;165;255m");
    /// ```
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// 24-bit background color sequence.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dashlane()
    }
}
