//! Composable UI component renderers.
//!
//! Each component appends one part of the frame at a given row and returns the
//! next free row.
//!
//! # Components
//!
//! - [`header`]: Title bar with the signed-in identity
//! - [`search`]: Search box and recent searches
//! - [`table`]: Item list with sort indicators and match highlighting
//! - [`prompt`]: Tool-missing, login and sync prompts
//! - [`details`]: One record's fields with a masked password
//! - [`status`]: Timestamped status message and clipboard countdown
//! - [`footer`]: Key hints

pub mod details;
pub mod footer;
pub mod header;
pub mod prompt;
pub mod search;
pub mod status;
pub mod table;

pub use details::render_details;
pub use footer::render_footer;
pub use header::render_header;
pub use prompt::render_prompt;
pub use search::render_search_bar;
pub use status::render_status;
pub use table::render_table;
