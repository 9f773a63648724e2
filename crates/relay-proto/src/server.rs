//! Server to client messages.
//!
//! Decoding is two-phase: the `type` discriminator is read first, then the
//! frame is parsed again as exactly one variant. This keeps the unknown-type
//! path separate from the malformed-payload path, which a derived internally
//! tagged enum would collapse into a single error.

use serde::{Deserialize, Serialize};

use crate::DecodeError;

/// Incremental assistant output for the in-progress turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantChunk {
    /// Session the chunk belongs to.
    #[serde(default)]
    pub session_id: String,
    /// Text to append to the stream buffer.
    pub content: String,
    /// Server sequence number. Informational only.
    #[serde(default)]
    pub seq: u64,
}

/// Finalizes the current assistant turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantMessage {
    /// Session the message belongs to.
    #[serde(default)]
    pub session_id: String,
    /// Full message text. Empty means "use what was streamed".
    pub content: String,
    /// Server sequence number. Informational only.
    #[serde(default)]
    pub seq: u64,
}

/// Out-of-band request to approve a tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRequest {
    /// Session the request belongs to.
    #[serde(default)]
    pub session_id: String,
    /// Identifier echoed back in the response.
    pub request_id: String,
    /// Tool asking for permission.
    pub tool_name: String,
    /// Arbitrary tool arguments.
    #[serde(default)]
    pub tool_input: serde_json::Value,
    /// Human-readable description. May be empty.
    #[serde(default)]
    pub description: String,
}

/// Server-side session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Idle and accepting input.
    #[default]
    Ready,
    /// Processing a turn.
    Busy,
    /// Session failed.
    Error,
}

impl SessionStatus {
    /// Wire spelling of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Busy => "busy",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Session being reported.
    #[serde(default)]
    pub session_id: String,
    /// New status.
    pub status: SessionStatus,
    /// Messages exchanged so far.
    #[serde(default)]
    pub message_count: u64,
}

/// Outcome of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMessage {
    /// Session the result belongs to.
    #[serde(default)]
    pub session_id: String,
    /// Whether the turn succeeded.
    pub success: bool,
    /// Failure description. `None` or empty on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Server sequence number. Informational only.
    #[serde(default)]
    pub seq: u64,
}

impl ResultMessage {
    /// Error text to surface, if this is a failure with a non-empty error.
    pub fn failure_text(&self) -> Option<&str> {
        if self.success {
            return None;
        }
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// A decoded server frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// `assistant_chunk`
    AssistantChunk(AssistantChunk),
    /// `assistant_message`
    AssistantMessage(AssistantMessage),
    /// `permission_request`
    PermissionRequest(PermissionRequest),
    /// `session_state`
    SessionState(SessionState),
    /// `result`
    Result(ResultMessage),
    /// Any other discriminator.
    Unknown {
        /// Raw value of the `type` field.
        message_type: String,
    },
}

impl ServerMessage {
    /// Wire discriminator of this message.
    pub fn message_type(&self) -> &str {
        match self {
            Self::AssistantChunk(_) => ASSISTANT_CHUNK,
            Self::AssistantMessage(_) => ASSISTANT_MESSAGE,
            Self::PermissionRequest(_) => PERMISSION_REQUEST,
            Self::SessionState(_) => SESSION_STATE,
            Self::Result(_) => RESULT,
            Self::Unknown { message_type } => message_type,
        }
    }
}

const ASSISTANT_CHUNK: &str = "assistant_chunk";
const ASSISTANT_MESSAGE: &str = "assistant_message";
const PERMISSION_REQUEST: &str = "permission_request";
const SESSION_STATE: &str = "session_state";
const RESULT: &str = "result";

#[derive(Deserialize)]
struct Discriminator {
    #[serde(rename = "type")]
    message_type: String,
}

/// Decode one inbound frame.
///
/// # Errors
///
/// - [`DecodeError::Malformed`] if the frame has no readable `type`.
/// - [`DecodeError::InvalidFields`] if a known variant fails to parse.
pub fn decode(bytes: &[u8]) -> Result<ServerMessage, DecodeError> {
    let Discriminator { message_type } = serde_json::from_slice(bytes)
        .map_err(|e| DecodeError::Malformed { reason: e.to_string() })?;

    let message = match message_type.as_str() {
        ASSISTANT_CHUNK => ServerMessage::AssistantChunk(variant(&message_type, bytes)?),
        ASSISTANT_MESSAGE => ServerMessage::AssistantMessage(variant(&message_type, bytes)?),
        PERMISSION_REQUEST => ServerMessage::PermissionRequest(variant(&message_type, bytes)?),
        SESSION_STATE => ServerMessage::SessionState(variant(&message_type, bytes)?),
        RESULT => ServerMessage::Result(variant(&message_type, bytes)?),
        _ => ServerMessage::Unknown { message_type: message_type.clone() },
    };

    Ok(message)
}

fn variant<T>(message_type: &str, bytes: &[u8]) -> Result<T, DecodeError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_slice(bytes).map_err(|e| DecodeError::InvalidFields {
        message_type: message_type.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_decodes_with_extra_fields() {
        let frame = br#"{"type":"assistant_chunk","sessionId":"s1","content":"Hel","seq":3,"extra":true}"#;
        let msg = decode(frame).unwrap();

        assert_eq!(
            msg,
            ServerMessage::AssistantChunk(AssistantChunk {
                session_id: "s1".into(),
                content: "Hel".into(),
                seq: 3,
            })
        );
    }

    #[test]
    fn permission_request_defaults_optional_fields() {
        let frame = br#"{"type":"permission_request","requestId":"r1","toolName":"bash"}"#;
        let Ok(ServerMessage::PermissionRequest(req)) = decode(frame) else {
            panic!("expected permission request");
        };

        assert_eq!(req.tool_name, "bash");
        assert_eq!(req.request_id, "r1");
        assert!(req.description.is_empty());
        assert!(req.tool_input.is_null());
    }

    #[test]
    fn permission_request_keeps_tool_input() {
        let frame = br#"{"type":"permission_request","sessionId":"s","requestId":"r","toolName":"bash","toolInput":{"command":"ls"},"description":"list"}"#;
        let Ok(ServerMessage::PermissionRequest(req)) = decode(frame) else {
            panic!("expected permission request");
        };

        assert_eq!(req.tool_input["command"], "ls");
        assert_eq!(req.description, "list");
    }

    #[test]
    fn session_state_parses_status() {
        let frame = br#"{"type":"session_state","sessionId":"s","status":"busy","messageCount":4}"#;
        let msg = decode(frame).unwrap();

        assert!(matches!(
            msg,
            ServerMessage::SessionState(SessionState {
                status: SessionStatus::Busy,
                message_count: 4,
                ..
            })
        ));
    }

    #[test]
    fn unknown_status_is_invalid_fields() {
        let frame = br#"{"type":"session_state","status":"sleeping"}"#;
        let err = decode(frame).unwrap_err();

        assert!(matches!(err, DecodeError::InvalidFields { ref message_type, .. } if message_type == "session_state"));
    }

    #[test]
    fn unknown_type_is_a_value() {
        let msg = decode(br#"{"type":"tool_event","toolName":"bash"}"#).unwrap();

        assert_eq!(msg, ServerMessage::Unknown { message_type: "tool_event".into() });
        assert_eq!(msg.message_type(), "tool_event");
    }

    #[test]
    fn missing_discriminator_is_malformed() {
        assert!(matches!(decode(br#"{"content":"x"}"#), Err(DecodeError::Malformed { .. })));
        assert!(matches!(decode(br#"{"type":7}"#), Err(DecodeError::Malformed { .. })));
        assert!(matches!(decode(b"not json"), Err(DecodeError::Malformed { .. })));
    }

    #[test]
    fn missing_required_field_is_invalid_fields() {
        let err = decode(br#"{"type":"assistant_message","sessionId":"s"}"#).unwrap_err();

        assert!(err.to_string().starts_with("malformed assistant_message message"));
    }

    #[test]
    fn result_failure_text() {
        let failed = ResultMessage {
            session_id: String::new(),
            success: false,
            error: Some("boom".into()),
            seq: 0,
        };
        let silent = ResultMessage { error: Some(String::new()), ..failed.clone() };
        let ok = ResultMessage { success: true, ..failed.clone() };

        assert_eq!(failed.failure_text(), Some("boom"));
        assert_eq!(silent.failure_text(), None);
        assert_eq!(ok.failure_text(), None);
    }
}
