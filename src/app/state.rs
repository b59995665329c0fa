use crate::editor::{LineBuffer, SystemEditor};
use crate::helper::SubprocessHelper;
use crate::insert::{InsertOutcome, insert_review};
use crate::keybindings::KeybindingCache;
use crate::ui::theme::Theme;
use anyhow::Result;
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub struct AppState {
    pub buffer: LineBuffer,
    pub file_path: Option<PathBuf>,
    pub helper: SubprocessHelper,
    pub theme: Theme,
    pub keybindings: KeybindingCache,
    pub status_message: Option<(String, Instant)>,
    pub message_timeout: Duration,
    pub should_quit: bool,
    pub show_help: bool,
    pub unsaved_changes: bool,
    pub scroll_offset: usize,
}

impl AppState {
    pub fn new(
        buffer: LineBuffer,
        file_path: Option<PathBuf>,
        helper: SubprocessHelper,
        theme: Theme,
        keybindings: KeybindingCache,
        message_timeout: Duration,
    ) -> Self {
        Self {
            buffer,
            file_path,
            helper,
            theme,
            keybindings,
            status_message: None,
            message_timeout,
            should_quit: false,
            show_help: false,
            unsaved_changes: false,
            scroll_offset: 0,
        }
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    pub fn clear_expired_status_message(&mut self) {
        if let Some((_, shown_at)) = self.status_message {
            if shown_at.elapsed() >= self.message_timeout {
                self.status_message = None;
            }
        }
    }

    /// The clipboard-to-link action: one helper invocation, then either
    /// one splice into the current line or one status message.
    pub fn insert_review_at_cursor(&mut self) {
        let mut editor = SystemEditor::new(&mut self.buffer);
        match insert_review(&mut editor, &self.helper) {
            Ok(InsertOutcome::Inserted(_)) => {
                self.unsaved_changes = true;
            }
            Ok(InsertOutcome::Rejected(message)) => {
                self.set_status_message(message);
            }
            Err(err) => {
                self.set_status_message(format!("{err:#}"));
            }
        }
    }

    pub fn save(&mut self) -> Result<()> {
        let Some(path) = self.file_path.clone() else {
            self.set_status_message("No file name; open a file with `revlink edit FILE`");
            return Ok(());
        };
        self.buffer.save(&path)?;
        self.unsaved_changes = false;
        self.set_status_message(format!("Saved {}", path.display()));
        Ok(())
    }

    /// Keep the cursor row inside a viewport of `height` lines.
    pub fn update_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        let (row, _) = self.buffer.cursor();
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + height {
            self.scroll_offset = row + 1 - height;
        }
    }
}
