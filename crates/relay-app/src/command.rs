//! Slash command parsing.

/// Recognized slash commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    /// `/quit` or `/exit`
    Quit,
    /// `/reset`
    Reset,
    /// `/help`
    Help,
}

impl Command {
    /// Parse a submitted (already trimmed) draft.
    ///
    /// Only exact matches are commands; anything else, including unknown
    /// `/words`, is an ordinary message.
    pub(crate) fn parse(text: &str) -> Option<Self> {
        match text {
            "/quit" | "/exit" => Some(Self::Quit),
            "/reset" => Some(Self::Reset),
            "/help" => Some(Self::Help),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_commands() {
        assert_eq!(Command::parse("/quit"), Some(Command::Quit));
        assert_eq!(Command::parse("/exit"), Some(Command::Quit));
        assert_eq!(Command::parse("/reset"), Some(Command::Reset));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
    }

    #[test]
    fn everything_else_is_a_message() {
        assert_eq!(Command::parse("/join"), None);
        assert_eq!(Command::parse("/help me"), None);
        assert_eq!(Command::parse("help"), None);
        assert_eq!(Command::parse("/HELP"), None);
    }
}
