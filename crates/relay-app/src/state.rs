//! Conversation entries.

/// Who produced an entry. Determines how it is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Text the user submitted.
    User,
    /// Assistant output, help text, permission grants.
    Assistant,
    /// Local or protocol failures, denials, reset notices.
    Error,
}

/// One immutable line of conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    /// Producer of the entry.
    pub role: Role,
    /// Entry text.
    pub content: String,
}

impl ChatEntry {
    /// Create an entry.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}
