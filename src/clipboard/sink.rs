//! Where copied text actually goes.

use crate::domain::{Result, ViewerError};

/// A writable clipboard.
///
/// The guard owns exactly one sink, so implementations do not need to be
/// shareable across threads.
pub trait ClipboardSink: Send {
    /// Replaces the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Clipboard`] when the platform clipboard refuses
    /// the write.
    fn set_text(&mut self, text: &str) -> Result<()>;

    /// Empties the clipboard.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Clipboard`] when the platform clipboard refuses
    /// the write.
    fn clear(&mut self) -> Result<()>;
}

/// The operating system clipboard via `arboard`.
///
/// The handle is opened on first use and kept for the life of the sink. On X11
/// the copied text is only served while the handle is alive.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ViewerError::Clipboard(format!("cannot open clipboard: {e}")))?;
            tracing::debug!("system clipboard opened");
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ViewerError::Clipboard("clipboard unavailable".to_string()))
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.handle()?
            .set_text(text.to_owned())
            .map_err(|e| ViewerError::Clipboard(e.to_string()))
    }

    fn clear(&mut self) -> Result<()> {
        let handle = self.handle()?;
        // Some backends do not implement clear; an empty string works everywhere.
        handle
            .clear()
            .or_else(|_| handle.set_text(String::new()))
            .map_err(|e| ViewerError::Clipboard(e.to_string()))
    }
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("open", &self.inner.is_some())
            .finish()
    }
}
