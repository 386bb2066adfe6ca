//! Terminal rendering.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → ANSI frame
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready types computed from session state
//! - [`renderer`]: Frame layout
//! - [`components`]: One renderer per screen region
//! - [`helpers`]: Cursor movement, padding and match highlighting
//! - [`theme`]: Color palettes and ANSI escape generation

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::{DisplayItem, UIViewModel};
