//! Fuzz target for structured JSON attacks on the message decoder
//!
//! # Strategy
//!
//! - Deeply nested: `toolInput` nested to arbitrary depth
//! - Type confusion: known `type` with fields of the wrong JSON type
//! - Unknown types: arbitrary discriminators with arbitrary payloads
//! - Random fields: known `type` plus arbitrary key/value pairs
//!
//! # Invariants
//!
//! - NEVER panic
//! - Unknown discriminators decode to `Unknown` carrying the raw type
//! - Wrong field types on a known type are an error, never a message

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use relay_proto::{DecodeError, ServerMessage};
use serde_json::{Map, Value, json};

const KNOWN_TYPES: [&str; 5] =
    ["assistant_chunk", "assistant_message", "permission_request", "session_state", "result"];

#[derive(Debug, Clone, Arbitrary)]
enum JsonAttack {
    DeeplyNested { depth: u8, array: bool },
    TypeConfusion { known: u8, number: i64 },
    UnknownType { message_type: String, fields: Vec<(String, String)> },
    RandomFields { known: u8, fields: Vec<(String, FieldValue)> },
}

#[derive(Debug, Clone, Arbitrary)]
enum FieldValue {
    Null,
    Bool(bool),
    Number(i64),
    Text(String),
}

impl FieldValue {
    fn into_json(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => json!(b),
            Self::Number(n) => json!(n),
            Self::Text(s) => json!(s),
        }
    }
}

fn known(index: u8) -> &'static str {
    KNOWN_TYPES[usize::from(index) % KNOWN_TYPES.len()]
}

fuzz_target!(|attack: JsonAttack| {
    match attack {
        JsonAttack::DeeplyNested { depth, array } => {
            let mut input = json!("leaf");
            for _ in 0..(depth % 100) {
                input = if array { json!([input]) } else { json!({ "k": input }) };
            }
            let frame = json!({
                "type": "permission_request",
                "requestId": "r",
                "toolName": "t",
                "toolInput": input,
            });

            let decoded = relay_proto::decode(frame.to_string().as_bytes());
            assert!(matches!(decoded, Ok(ServerMessage::PermissionRequest(_))));
        },

        JsonAttack::TypeConfusion { known: index, number } => {
            // Every required field replaced by a number.
            let frame = json!({
                "type": known(index),
                "content": number,
                "requestId": number,
                "toolName": number,
                "status": number,
                "success": number,
            });

            let decoded = relay_proto::decode(frame.to_string().as_bytes());
            assert!(matches!(decoded, Err(DecodeError::InvalidFields { .. })));
        },

        JsonAttack::UnknownType { message_type, fields } => {
            if KNOWN_TYPES.contains(&message_type.as_str()) {
                return;
            }
            let mut object: Map<String, Value> =
                fields.into_iter().map(|(k, v)| (k, json!(v))).collect();
            object.insert("type".into(), json!(message_type));

            let decoded = relay_proto::decode(Value::Object(object).to_string().as_bytes());
            assert_eq!(decoded, Ok(ServerMessage::Unknown { message_type }));
        },

        JsonAttack::RandomFields { known: index, fields } => {
            let mut object: Map<String, Value> =
                fields.into_iter().map(|(k, v)| (k, v.into_json())).collect();
            object.insert("type".into(), json!(known(index)));

            let _ = relay_proto::decode(Value::Object(object).to_string().as_bytes());
        },
    }
});
