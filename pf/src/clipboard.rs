//! Clipboard collaborator
//!
//! Copies the generated prompt verbatim. Failures are reported to the caller
//! and never fatal; pressing copy again simply retries.

use thiserror::Error;
use tracing::{debug, warn};

/// Errors from clipboard access
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write clipboard: {0}")]
    Write(String),
}

/// Something that can receive copied text
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard
///
/// Opened lazily on first copy. On X11 the contents are only served while the
/// handle is alive, so it is kept for the life of the sink.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        debug!(len = text.len(), "SystemClipboard::set_text: called");
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|e| {
                warn!("Failed to open system clipboard: {}", e);
                ClipboardError::Unavailable(e.to_string())
            })?;
            self.inner = Some(clipboard);
        }

        let Some(clipboard) = self.inner.as_mut() else {
            return Err(ClipboardError::Unavailable("clipboard not initialized".to_string()));
        };
        if let Err(e) = clipboard.set_text(text.to_string()) {
            // Drop the handle so the next attempt reopens it
            self.inner = None;
            return Err(ClipboardError::Write(e.to_string()));
        }
        Ok(())
    }
}

/// In-memory clipboard for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    /// Fail every write (simulates a missing clipboard)
    pub fail: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            contents: None,
            fail: true,
        }
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::Unavailable("memory clipboard set to fail".to_string()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}
