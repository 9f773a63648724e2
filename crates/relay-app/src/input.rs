//! Terminal-agnostic keyboard input.

/// Keyboard input abstraction.
///
/// Decouples the state machine from the terminal library so key sequences can
/// be replayed in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key (submit).
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Tab key.
    Tab,
    /// Escape key.
    Esc,
    /// Interrupt shortcut (Ctrl+C).
    Interrupt,
    /// Quit shortcut (Ctrl+D).
    Quit,
}
