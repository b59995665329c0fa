use anyhow::{Context, Result};
use arboard::Clipboard;

/// Read the current text content of the system clipboard.
///
/// Returns an error if the clipboard is unavailable or holds no text.
pub fn read_text() -> Result<String> {
    let mut clipboard = Clipboard::new().context("Failed to access system clipboard")?;
    clipboard
        .get_text()
        .context("Failed to read text from clipboard")
}
