//! Status bar
//!
//! Displays the connection indicator, session status, and server name.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};
use relay_app::App;

use crate::Theme;

const MIN_GAP: usize = 2;

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, theme: &Theme, server_name: &str, area: Rect) {
    let connection = if app.is_connected() {
        Span::styled("● Connected", theme.connected)
    } else {
        Span::styled("● Disconnected", theme.disconnected)
    };
    let session = format!("Session: {}", app.status());

    // One column of padding on each side.
    let used = connection.width() + session.chars().count() + server_name.chars().count() + 2;
    let gap = (area.width as usize).saturating_sub(used).max(MIN_GAP);
    let left = gap / 2;

    let line = Line::from(vec![
        Span::raw(" "),
        connection,
        Span::raw(" ".repeat(left)),
        Span::raw(session),
        Span::raw(" ".repeat(gap - left)),
        Span::raw(server_name.to_owned()),
    ]);

    frame.render_widget(Paragraph::new(line).style(theme.status_bar), area);
}
