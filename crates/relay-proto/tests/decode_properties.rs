//! Property-based tests for frame decoding.
//!
//! Decoding faces arbitrary bytes from the network, so it must classify every
//! input as a message, an unknown type, or a malformed frame without
//! panicking.

use proptest::prelude::*;
use relay_proto::{ClientMessage, DecodeError, ServerMessage, decode, encode};

const KNOWN_TYPES: [&str; 5] =
    ["assistant_chunk", "assistant_message", "permission_request", "session_state", "result"];

/// Strategy for discriminators that are never one of the known five.
fn unknown_type() -> impl Strategy<Value = String> {
    "[a-z_]{1,24}".prop_filter("must not be a known type", |s| !KNOWN_TYPES.contains(&s.as_str()))
}

proptest! {
    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode(&bytes);
    }

    #[test]
    fn prop_unknown_type_is_reported_not_rejected(kind in unknown_type(), content in ".{0,32}") {
        let frame = serde_json::json!({ "type": kind, "content": content }).to_string();

        let msg = decode(frame.as_bytes());
        prop_assert_eq!(msg, Ok(ServerMessage::Unknown { message_type: kind }));
    }

    #[test]
    fn prop_chunk_content_survives(content in ".{0,256}", seq in any::<u64>()) {
        let frame = serde_json::json!({
            "type": "assistant_chunk",
            "sessionId": "s",
            "content": content,
            "seq": seq,
        })
        .to_string();

        match decode(frame.as_bytes()) {
            Ok(ServerMessage::AssistantChunk(chunk)) => {
                prop_assert_eq!(chunk.content, content);
                prop_assert_eq!(chunk.seq, seq);
            },
            other => prop_assert!(false, "unexpected decode result: {:?}", other),
        }
    }

    #[test]
    fn prop_known_type_without_fields_is_invalid(idx in 0usize..KNOWN_TYPES.len()) {
        let kind = KNOWN_TYPES[idx];
        let frame = serde_json::json!({ "type": kind }).to_string();

        let is_invalid_fields = matches!(
            decode(frame.as_bytes()),
            Err(DecodeError::InvalidFields { ref message_type, .. }) if message_type == kind
        );
        prop_assert!(is_invalid_fields);
    }

    #[test]
    fn prop_user_text_is_escaped(text in ".{0,128}") {
        let json = encode(&ClientMessage::user_message("s", text.clone())).unwrap();
        let back: ClientMessage = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(back, ClientMessage::user_message("s", text));
    }
}
