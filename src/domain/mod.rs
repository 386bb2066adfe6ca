//! Domain layer for dashview.
//!
//! Core types with no dependency on processes, the clipboard or the terminal:
//! vault records, their classification and the error taxonomy.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`record`]: The raw vault record wrapper
//! - [`category`]: Record classification for display and sorting
//!
//! # Examples
//!
//! ```
//! use dashview::domain::{classify, Category, Record};
//!
//! let record: Record = serde_json::from_str(
//!     r#"{"title":"Site A","login":"a@x.com","password":"p1"}"#,
//! ).unwrap();
//! assert_eq!(classify(&record), Category::Login);
//! assert_eq!(record.login(), "a@x.com");
//! ```

pub mod category;
pub mod error;
pub mod record;

pub use category::{classify, missing_password_message, Category};
pub use error::{CliError, Result, ViewerError};
pub use record::Record;
