use crate::utils::unicode::{byte_index_for_char, char_len};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// A plain text buffer: lines plus a (row, column) cursor.
///
/// Columns count characters, not bytes, so the cursor can never land
/// inside a UTF-8 sequence. The buffer always holds at least one line.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
    /// Whether the source text ended with a newline; `to_text` restores
    /// it so an unedited buffer round-trips byte for byte.
    trailing_newline: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            trailing_newline: true,
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(|l| l.to_string()).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            row: 0,
            col: 0,
            trailing_newline: text.ends_with('\n'),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::from_text(&text))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_text())
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        if self.trailing_newline {
            text.push('\n');
        }
        text
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|l| l.as_str())
    }

    pub fn set_line(&mut self, row: usize, text: String) {
        if let Some(line) = self.lines.get_mut(row) {
            *line = text;
        }
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Move the cursor, clamping to the buffer's extents.
    pub fn move_cursor(&mut self, row: usize, col: usize) {
        self.row = row.min(self.lines.len() - 1);
        self.col = col.min(char_len(&self.lines[self.row]));
    }

    fn current_line_len(&self) -> usize {
        char_len(&self.lines[self.row])
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = byte_index_for_char(&self.lines[self.row], self.col);
        self.lines[self.row].insert(idx, c);
        self.col += 1;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            let start = byte_index_for_char(&self.lines[self.row], self.col - 1);
            let end = byte_index_for_char(&self.lines[self.row], self.col);
            self.lines[self.row].replace_range(start..end, "");
            self.col -= 1;
        } else if self.row > 0 {
            // Join with the previous line
            let removed = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.current_line_len();
            self.lines[self.row].push_str(&removed);
        }
    }

    pub fn delete_forward(&mut self) {
        if self.col < self.current_line_len() {
            let start = byte_index_for_char(&self.lines[self.row], self.col);
            let end = byte_index_for_char(&self.lines[self.row], self.col + 1);
            self.lines[self.row].replace_range(start..end, "");
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    /// Split the current line at the cursor, moving to the new line.
    pub fn insert_newline(&mut self) {
        let idx = byte_index_for_char(&self.lines[self.row], self.col);
        let rest = self.lines[self.row].split_off(idx);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.current_line_len();
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.current_line_len() {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.current_line_len());
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.current_line_len());
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.current_line_len();
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buffer = LineBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line(0), Some(""));
        assert_eq!(buffer.cursor(), (0, 0));
    }

    #[test]
    fn test_from_text() {
        let buffer = LineBuffer::from_text("one\ntwo\nthree\n");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line(1), Some("two"));
    }

    #[test]
    fn test_insert_char() {
        let mut buffer = LineBuffer::from_text("hllo");
        buffer.move_cursor(0, 1);
        buffer.insert_char('e');
        assert_eq!(buffer.line(0), Some("hello"));
        assert_eq!(buffer.cursor(), (0, 2));
    }

    #[test]
    fn test_insert_char_multibyte() {
        let mut buffer = LineBuffer::from_text("aö");
        buffer.move_cursor(0, 2);
        buffer.insert_char('b');
        assert_eq!(buffer.line(0), Some("aöb"));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut buffer = LineBuffer::from_text("one\ntwo");
        buffer.move_cursor(1, 0);
        buffer.backspace();
        assert_eq!(buffer.line(0), Some("onetwo"));
        assert_eq!(buffer.cursor(), (0, 3));
    }

    #[test]
    fn test_delete_forward_joins_lines() {
        let mut buffer = LineBuffer::from_text("one\ntwo");
        buffer.move_cursor(0, 3);
        buffer.delete_forward();
        assert_eq!(buffer.line(0), Some("onetwo"));
        assert_eq!(buffer.line_count(), 1);
    }

    #[test]
    fn test_insert_newline_splits_line() {
        let mut buffer = LineBuffer::from_text("onetwo");
        buffer.move_cursor(0, 3);
        buffer.insert_newline();
        assert_eq!(buffer.line(0), Some("one"));
        assert_eq!(buffer.line(1), Some("two"));
        assert_eq!(buffer.cursor(), (1, 0));
    }

    #[test]
    fn test_move_cursor_clamps() {
        let mut buffer = LineBuffer::from_text("ab\ncdef");
        buffer.move_cursor(99, 99);
        assert_eq!(buffer.cursor(), (1, 4));
    }

    #[test]
    fn test_move_up_clamps_column() {
        let mut buffer = LineBuffer::from_text("ab\ncdef");
        buffer.move_cursor(1, 4);
        buffer.move_up();
        assert_eq!(buffer.cursor(), (0, 2));
    }

    #[test]
    fn test_to_text_preserves_trailing_newline_state() {
        assert_eq!(LineBuffer::from_text("one\ntwo\n").to_text(), "one\ntwo\n");
        assert_eq!(LineBuffer::from_text("one\ntwo").to_text(), "one\ntwo");
        assert_eq!(LineBuffer::from_text("").to_text(), "");
        // A fresh scratch buffer saves with a final newline
        assert_eq!(LineBuffer::new().to_text(), "\n");
    }

    #[test]
    fn test_save_without_edits_keeps_file_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-newline.md");
        std::fs::write(&path, "alpha\nbeta").unwrap();

        let buffer = LineBuffer::load(&path).unwrap();
        buffer.save(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "alpha\nbeta");
    }

    #[test]
    fn test_load_and_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "alpha\nbeta\n").unwrap();

        let mut buffer = LineBuffer::load(&path).unwrap();
        buffer.move_cursor(1, 4);
        buffer.insert_char('!');
        buffer.save(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "alpha\nbeta!\n");
    }
}
