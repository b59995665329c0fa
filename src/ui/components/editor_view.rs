use crate::app::AppState;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::Line,
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

pub fn render(f: &mut Frame, state: &AppState, area: Rect) {
    let first = state.scroll_offset;
    let last = (first + area.height as usize).min(state.buffer.line_count());

    let lines: Vec<Line> = (first..last)
        .map(|row| Line::from(state.buffer.line(row).unwrap_or("")))
        .collect();

    let paragraph = Paragraph::new(lines).style(
        Style::default()
            .fg(state.theme.foreground)
            .bg(state.theme.background),
    );
    f.render_widget(paragraph, area);

    // Place the terminal cursor at the buffer cursor. The column is a
    // char offset; the screen offset is the display width of the text
    // before it.
    let (row, col) = state.buffer.cursor();
    if row >= first && row < last {
        let line = state.buffer.line(row).unwrap_or("");
        let prefix: String = line.chars().take(col).collect();
        let x = area.x + (prefix.width() as u16).min(area.width.saturating_sub(1));
        let y = area.y + (row - first) as u16;
        f.set_cursor_position(Position::new(x, y));
    }
}
