//! Visual styles.
//!
//! A [`Theme`] is built once at startup and passed by reference to every
//! render function. Nothing in the UI mutates it.

use ratatui::style::{Color, Modifier, Style};

/// Styles for every element the UI draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// "You" label above user entries.
    pub user: Style,
    /// "Claude" label above assistant entries.
    pub assistant: Style,
    /// Live stream buffer and its cursor glyph.
    pub stream: Style,
    /// Error entries.
    pub error: Style,
    /// Permission box border.
    pub permission_border: Style,
    /// Permission box title.
    pub permission_title: Style,
    /// Tool name inside the permission box.
    pub permission_tool: Style,
    /// Connected indicator.
    pub connected: Style,
    /// Disconnected indicator.
    pub disconnected: Style,
    /// Status bar background and text.
    pub status_bar: Style,
    /// `> ` prompt in front of the draft.
    pub input_prompt: Style,
}

impl Default for Theme {
    fn default() -> Self {
        let fg = |index| Style::default().fg(Color::Indexed(index));
        let bold = |index| fg(index).add_modifier(Modifier::BOLD);

        Self {
            user: bold(12),
            assistant: fg(10),
            stream: fg(250),
            error: bold(9),
            permission_border: fg(11),
            permission_title: bold(11),
            permission_tool: bold(14),
            connected: fg(10),
            disconnected: fg(9),
            status_bar: Style::default().bg(Color::Indexed(236)).fg(Color::Indexed(252)),
            input_prompt: bold(12),
        }
    }
}
