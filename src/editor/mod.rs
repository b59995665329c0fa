pub mod buffer;

pub use buffer::LineBuffer;

use crate::clipboard;
use anyhow::Result;

/// The slice of editor state the link inserter needs: the clipboard,
/// the cursor, and line-level access to the buffer. Keeping this behind
/// a trait lets tests run the inserter against an in-memory fake.
pub trait EditorContext {
    fn read_clipboard(&mut self) -> Result<String>;
    fn cursor(&self) -> (usize, usize);
    fn line(&self, row: usize) -> Option<&str>;
    fn set_line(&mut self, row: usize, text: String);
    fn move_cursor(&mut self, row: usize, col: usize);
}

/// A `LineBuffer` paired with the system clipboard. This is what the
/// TUI hands to the inserter.
pub struct SystemEditor<'a> {
    buffer: &'a mut LineBuffer,
}

impl<'a> SystemEditor<'a> {
    pub fn new(buffer: &'a mut LineBuffer) -> Self {
        Self { buffer }
    }
}

impl EditorContext for SystemEditor<'_> {
    fn read_clipboard(&mut self) -> Result<String> {
        clipboard::read_text()
    }

    fn cursor(&self) -> (usize, usize) {
        self.buffer.cursor()
    }

    fn line(&self, row: usize) -> Option<&str> {
        self.buffer.line(row)
    }

    fn set_line(&mut self, row: usize, text: String) {
        self.buffer.set_line(row, text);
    }

    fn move_cursor(&mut self, row: usize, col: usize) {
        self.buffer.move_cursor(row, col);
    }
}
