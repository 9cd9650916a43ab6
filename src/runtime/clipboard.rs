//! System clipboard access.

use anyhow::{Context, Result};
use arboard::Clipboard;
use log::debug;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self, text))]
    pub(crate) fn copy_to_clipboard_impl(&self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to open the system clipboard")?;
        clipboard
            .set_text(text)
            .context("Failed to write to the system clipboard")?;
        debug!("Copied {} bytes to the clipboard", text.len());
        Ok(())
    }
}
