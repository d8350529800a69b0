use anyhow::{Context, Result};
use async_trait::async_trait;
use client_core::Clipboard;

/// Desktop clipboard. A fresh handle is opened per write so nothing
/// platform-bound is held across awaits.
pub struct SystemClipboard;

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("failed to open system clipboard")?;
        clipboard
            .set_text(text.to_string())
            .context("failed to write system clipboard")
    }
}
