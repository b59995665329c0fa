use super::state::AppState;
use crate::keybindings::Action;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Result<()> {
    if state.show_help {
        state.show_help = false;
        return Ok(());
    }

    if let Some(action) = state.keybindings.get(&key) {
        dispatch_action(action, state)?;
        return Ok(());
    }

    // Anything printable and unbound self-inserts
    if let KeyCode::Char(c) = key.code {
        if key
            .modifiers
            .difference(KeyModifiers::SHIFT)
            .is_empty()
        {
            state.buffer.insert_char(c);
            state.unsaved_changes = true;
        }
    }

    Ok(())
}

fn dispatch_action(action: Action, state: &mut AppState) -> Result<()> {
    match action {
        Action::MoveLeft => state.buffer.move_left(),
        Action::MoveRight => state.buffer.move_right(),
        Action::MoveUp => state.buffer.move_up(),
        Action::MoveDown => state.buffer.move_down(),
        Action::MoveHome => state.buffer.move_home(),
        Action::MoveEnd => state.buffer.move_end(),
        Action::Backspace => {
            state.buffer.backspace();
            state.unsaved_changes = true;
        }
        Action::DeleteForward => {
            state.buffer.delete_forward();
            state.unsaved_changes = true;
        }
        Action::InsertNewline => {
            state.buffer.insert_newline();
            state.unsaved_changes = true;
        }
        Action::InsertReview => {
            state.insert_review_at_cursor();
        }
        Action::Save => {
            if let Err(err) = state.save() {
                state.set_status_message(format!("{err:#}"));
            }
        }
        Action::Quit => {
            state.should_quit = true;
        }
        Action::ToggleHelp => {
            state.show_help = !state.show_help;
        }
        Action::Dismiss => {
            state.status_message = None;
        }
    }
    Ok(())
}
