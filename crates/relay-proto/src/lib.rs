//! Wire messages for the relay channel.
//!
//! Every frame on the channel is one JSON object discriminated by a `type`
//! field. Server frames decode into [`ServerMessage`], client envelopes are
//! built as [`ClientMessage`] and encoded back to JSON text.
//!
//! # Invariants
//!
//! - Decoding never panics. Bytes that are not a JSON object with a string
//!   `type` are [`DecodeError::Malformed`]; a known `type` whose required
//!   fields do not parse is [`DecodeError::InvalidFields`].
//! - An unrecognized `type` is a value ([`ServerMessage::Unknown`]), not an
//!   error, so callers can report it and keep reading.
//! - Each [`ClientMessage`] variant fixes its own `type` and carries the
//!   active session id; nothing else is inferred.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod error;
mod server;

pub use client::{ClientMessage, encode};
pub use error::{DecodeError, EncodeError};
pub use server::{
    AssistantChunk, AssistantMessage, PermissionRequest, ResultMessage, ServerMessage,
    SessionState, SessionStatus, decode,
};
