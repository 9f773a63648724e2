//! Client to server envelopes.

use serde::{Deserialize, Serialize};

use crate::EncodeError;

/// Outbound envelope.
///
/// Serialized with a `type` tag and camelCase fields, e.g.
/// `{"type":"interrupt","sessionId":"abc"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// User prompt.
    UserMessage {
        /// Active session.
        session_id: String,
        /// Prompt text.
        text: String,
    },

    /// Answer to a permission request.
    PermissionResponse {
        /// Active session.
        session_id: String,
        /// Request being answered.
        request_id: String,
        /// Whether the tool may run.
        allowed: bool,
    },

    /// Ask the server to stop the current turn.
    Interrupt {
        /// Active session.
        session_id: String,
    },

    /// Ask the server to reset the session.
    ResetSession {
        /// Active session.
        session_id: String,
    },
}

impl ClientMessage {
    /// Build a `user_message` envelope.
    pub fn user_message(session_id: &str, text: impl Into<String>) -> Self {
        Self::UserMessage { session_id: session_id.to_string(), text: text.into() }
    }

    /// Build a `permission_response` envelope.
    pub fn permission_response(session_id: &str, request_id: &str, allowed: bool) -> Self {
        Self::PermissionResponse {
            session_id: session_id.to_string(),
            request_id: request_id.to_string(),
            allowed,
        }
    }

    /// Build an `interrupt` envelope.
    pub fn interrupt(session_id: &str) -> Self {
        Self::Interrupt { session_id: session_id.to_string() }
    }

    /// Build a `reset_session` envelope.
    pub fn reset_session(session_id: &str) -> Self {
        Self::ResetSession { session_id: session_id.to_string() }
    }

    /// Wire discriminator of this envelope.
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::UserMessage { .. } => "user_message",
            Self::PermissionResponse { .. } => "permission_response",
            Self::Interrupt { .. } => "interrupt",
            Self::ResetSession { .. } => "reset_session",
        }
    }

    /// Session the envelope is addressed to.
    pub fn session_id(&self) -> &str {
        match self {
            Self::UserMessage { session_id, .. }
            | Self::PermissionResponse { session_id, .. }
            | Self::Interrupt { session_id }
            | Self::ResetSession { session_id } => session_id,
        }
    }
}

/// Encode an envelope as one JSON text frame.
///
/// # Errors
///
/// Returns [`EncodeError`] if serialization fails. With the current field
/// types this does not happen in practice, but the serializer is fallible.
pub fn encode(message: &ClientMessage) -> Result<String, EncodeError> {
    serde_json::to_string(message)
        .map_err(|source| EncodeError { message_type: message.message_type(), source })
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn user_message_wire_shape() {
        let json = encode(&ClientMessage::user_message("s-1", "hello")).unwrap();
        assert_snapshot!(json, @r#"{"type":"user_message","sessionId":"s-1","text":"hello"}"#);
    }

    #[test]
    fn permission_response_wire_shape() {
        let json = encode(&ClientMessage::permission_response("s-1", "req-9", true)).unwrap();
        assert_snapshot!(json, @r#"{"type":"permission_response","sessionId":"s-1","requestId":"req-9","allowed":true}"#);
    }

    #[test]
    fn interrupt_wire_shape() {
        let json = encode(&ClientMessage::interrupt("s-1")).unwrap();
        assert_snapshot!(json, @r#"{"type":"interrupt","sessionId":"s-1"}"#);
    }

    #[test]
    fn reset_session_wire_shape() {
        let json = encode(&ClientMessage::reset_session("s-1")).unwrap();
        assert_snapshot!(json, @r#"{"type":"reset_session","sessionId":"s-1"}"#);
    }

    #[test]
    fn every_envelope_carries_session_id() {
        let messages = [
            ClientMessage::user_message("abc", "x"),
            ClientMessage::permission_response("abc", "r", false),
            ClientMessage::interrupt("abc"),
            ClientMessage::reset_session("abc"),
        ];

        for message in messages {
            let value: serde_json::Value = serde_json::from_str(&encode(&message).unwrap()).unwrap();
            assert_eq!(value["sessionId"], "abc");
            assert_eq!(value["type"], message.message_type());
        }
    }
}
