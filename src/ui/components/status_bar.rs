use crate::app::AppState;
use crate::keybindings::Action;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn render(f: &mut Frame, state: &AppState, area: Rect) {
    let base_style = Style::default()
        .fg(state.theme.status_bar_fg)
        .bg(state.theme.status_bar_bg);

    // A transient message takes over the whole bar until it expires
    if let Some((message, _)) = &state.status_message {
        let style = base_style.fg(state.theme.message_fg);
        let bar = Paragraph::new(Line::from(Span::styled(format!(" {message}"), style)));
        f.render_widget(bar, area);
        return;
    }

    let file_label = state
        .file_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "[scratch]".to_string());
    let save_indicator = if state.unsaved_changes {
        " [unsaved]"
    } else {
        ""
    };

    let (row, col) = state.buffer.cursor();
    let position = format!("{}:{}", row + 1, col + 1);

    let insert_key = state
        .keybindings
        .key_for(Action::InsertReview)
        .map(|k| k.to_string())
        .unwrap_or_else(|| "<C-r>".to_string());
    let hint = format!("<F1> help  {insert_key} insert link  <C-s> save  <C-q> quit");
    let version_text = format!("v{VERSION}");

    let left_content = format!(" {file_label}{save_indicator} | {position}");

    let padding = area.width.saturating_sub(
        left_content.len() as u16 + hint.len() as u16 + version_text.len() as u16 + 3,
    );

    let status_line = format!(
        "{} {} {:>padding$} {}",
        left_content,
        hint,
        "",
        version_text,
        padding = padding as usize
    );

    let bar = Paragraph::new(Line::from(Span::styled(status_line, base_style)));
    f.render_widget(bar, area);
}
