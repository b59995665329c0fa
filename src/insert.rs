use crate::editor::EditorContext;
use crate::utils::unicode::{byte_index_for_char, char_len};
use anyhow::Result;
use tracing::debug;

/// Exit status and captured output of one helper invocation.
#[derive(Debug, Clone)]
pub struct HelperOutput {
    pub success: bool,
    pub text: String,
}

/// Abstraction over the `<helper> review <url>` call-out, so tests can
/// substitute a deterministic fake for the real subprocess.
pub trait HelperRunner {
    fn run_review(&self, url: &str) -> Result<HelperOutput>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The trimmed helper output that was spliced into the buffer.
    Inserted(String),
    /// The helper failed; the buffer was left untouched and this is the
    /// message to show the user.
    Rejected(String),
}

/// Read a URL from the clipboard, resolve it through the helper, and on
/// success splice the result into the current line at the cursor column.
///
/// The clipboard content is passed to the helper unchanged, even when it
/// is empty or not a URL; validating it is the helper's job. The call
/// blocks until the helper exits.
pub fn insert_review(
    editor: &mut dyn EditorContext,
    runner: &dyn HelperRunner,
) -> Result<InsertOutcome> {
    let url = editor.read_clipboard()?;
    let output = runner.run_review(&url)?;
    let text = output.text.trim().to_string();

    if !output.success {
        debug!(url, "helper rejected query");
        return Ok(InsertOutcome::Rejected(text));
    }

    let (row, col) = editor.cursor();
    let line = editor.line(row).unwrap_or("").to_string();
    let col = col.min(char_len(&line));
    let split = byte_index_for_char(&line, col);

    let mut newline = String::with_capacity(line.len() + text.len());
    newline.push_str(&line[..split]);
    newline.push_str(&text);
    newline.push_str(&line[split..]);

    editor.set_line(row, newline);
    editor.move_cursor(row, col + char_len(&text));

    Ok(InsertOutcome::Inserted(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::LineBuffer;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    struct FakeEditor {
        buffer: LineBuffer,
        clipboard: String,
    }

    impl FakeEditor {
        fn new(text: &str, clipboard: &str) -> Self {
            Self {
                buffer: LineBuffer::from_text(text),
                clipboard: clipboard.to_string(),
            }
        }
    }

    impl EditorContext for FakeEditor {
        fn read_clipboard(&mut self) -> Result<String> {
            Ok(self.clipboard.clone())
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

    struct FakeHelper {
        success: bool,
        output: String,
        calls: RefCell<Vec<String>>,
    }

    impl FakeHelper {
        fn new(success: bool, output: &str) -> Self {
            Self {
                success,
                output: output.to_string(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl HelperRunner for FakeHelper {
        fn run_review(&self, url: &str) -> Result<HelperOutput> {
            self.calls.borrow_mut().push(url.to_string());
            Ok(HelperOutput {
                success: self.success,
                text: self.output.clone(),
            })
        }
    }

    #[test]
    fn test_success_splices_at_cursor() {
        let mut editor = FakeEditor::new("TODO: ", "https://github.com/org/repo/issues/42");
        editor.move_cursor(0, 5);
        let link = "[GH#42: Fix bug](https://github.com/org/repo/issues/42)";
        let helper = FakeHelper::new(true, &format!("  {link}  "));

        let outcome = insert_review(&mut editor, &helper).unwrap();

        assert_eq!(outcome, InsertOutcome::Inserted(link.to_string()));
        assert_eq!(editor.line(0), Some(format!("TODO:{link} ").as_str()));
        assert_eq!(editor.cursor(), (0, 5 + link.chars().count()));
        assert_eq!(
            helper.calls.borrow().as_slice(),
            &["https://github.com/org/repo/issues/42".to_string()]
        );
    }

    #[test]
    fn test_failure_leaves_buffer_untouched() {
        let mut editor = FakeEditor::new("TODO: ", "not-a-url");
        editor.move_cursor(0, 5);
        let helper = FakeHelper::new(false, "error: invalid URL\n");

        let outcome = insert_review(&mut editor, &helper).unwrap();

        assert_eq!(outcome, InsertOutcome::Rejected("error: invalid URL".to_string()));
        assert_eq!(editor.line(0), Some("TODO: "));
        assert_eq!(editor.cursor(), (0, 5));
    }

    #[test]
    fn test_splice_is_not_an_append() {
        let mut editor = FakeEditor::new("head tail", "u");
        editor.move_cursor(0, 4);
        let helper = FakeHelper::new(true, "MID");

        insert_review(&mut editor, &helper).unwrap();

        assert_eq!(editor.line(0), Some("headMID tail"));
        assert_eq!(editor.cursor(), (0, 7));
    }

    #[test]
    fn test_double_invocation_inserts_twice() {
        let mut editor = FakeEditor::new("ab", "u");
        editor.move_cursor(0, 1);
        let helper = FakeHelper::new(true, "X");

        insert_review(&mut editor, &helper).unwrap();
        insert_review(&mut editor, &helper).unwrap();

        assert_eq!(editor.line(0), Some("aXXb"));
        assert_eq!(editor.cursor(), (0, 3));
    }

    #[test]
    fn test_empty_clipboard_still_invokes_helper() {
        let mut editor = FakeEditor::new("", "");
        let helper = FakeHelper::new(false, "error: empty query");

        let outcome = insert_review(&mut editor, &helper).unwrap();

        assert_eq!(outcome, InsertOutcome::Rejected("error: empty query".to_string()));
        assert_eq!(helper.calls.borrow().as_slice(), &[String::new()]);
    }

    #[test]
    fn test_splice_into_multibyte_line() {
        let mut editor = FakeEditor::new("aöb", "u");
        editor.move_cursor(0, 2);
        let helper = FakeHelper::new(true, "ß");

        insert_review(&mut editor, &helper).unwrap();

        assert_eq!(editor.line(0), Some("aößb"));
        assert_eq!(editor.cursor(), (0, 3));
    }

    /// An editor whose cursor reports a column past the end of the line.
    struct StaleCursorEditor {
        inner: FakeEditor,
    }

    impl EditorContext for StaleCursorEditor {
        fn read_clipboard(&mut self) -> Result<String> {
            self.inner.read_clipboard()
        }

        fn cursor(&self) -> (usize, usize) {
            (0, 99)
        }

        fn line(&self, row: usize) -> Option<&str> {
            self.inner.line(row)
        }

        fn set_line(&mut self, row: usize, text: String) {
            self.inner.set_line(row, text);
        }

        fn move_cursor(&mut self, row: usize, col: usize) {
            self.inner.move_cursor(row, col);
        }
    }

    #[test]
    fn test_cursor_past_end_clamps_to_line_length() {
        let mut editor = StaleCursorEditor {
            inner: FakeEditor::new("ab", "u"),
        };
        let helper = FakeHelper::new(true, "X");

        insert_review(&mut editor, &helper).unwrap();

        assert_eq!(editor.inner.line(0), Some("abX"));
        assert_eq!(editor.inner.cursor(), (0, 3));
    }
}
