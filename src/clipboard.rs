//! Clipboard backends for copy controls
//!
//! Uses `arboard` crate for cross-platform support (Windows, macOS, Linux).
//! The system clipboard is created fresh each time to avoid holding resources.
//!
//! Copying is modelled as an infallible side effect: failures (no display
//! server, permission denied) are logged and otherwise ignored, and hosts
//! without a clipboard use [`NoopClipboard`].

use anyhow::{Context, Result};

/// Destination for copied text
pub trait Clipboard: Send + Sync {
    /// Place `text` on the clipboard
    fn copy_to_clipboard(&self, text: &str);
}

/// The platform clipboard via arboard
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    fn try_copy(text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("Failed to access clipboard")?;
        clipboard
            .set_text(text)
            .context("Failed to set clipboard text")?;
        Ok(())
    }
}

impl Clipboard for SystemClipboard {
    fn copy_to_clipboard(&self, text: &str) {
        match Self::try_copy(text) {
            Ok(()) => tracing::debug!("Copied {} bytes to clipboard", text.len()),
            Err(e) => tracing::warn!("Clipboard unavailable: {:#}", e),
        }
    }
}

/// Clipboard for hosts without one; copying does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClipboard;

impl Clipboard for NoopClipboard {
    fn copy_to_clipboard(&self, _text: &str) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Clipboard;
    use std::sync::Mutex;

    /// Records every payload it receives
    #[derive(Debug, Default)]
    pub struct RecordingClipboard {
        pub copies: Mutex<Vec<String>>,
    }

    impl RecordingClipboard {
        pub fn copies(&self) -> Vec<String> {
            self.copies.lock().unwrap().clone()
        }
    }

    impl Clipboard for RecordingClipboard {
        fn copy_to_clipboard(&self, text: &str) {
            self.copies.lock().unwrap().push(text.to_string());
        }
    }
}
