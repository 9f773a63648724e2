//! Application input events.
//!
//! [`AppEvent`] is the complete set of inputs to the [`crate::App`] fold.
//! Events originate from three sources:
//! - User interaction (keys, resize) via the driver.
//! - Inbound frames, decoded before they reach the fold.
//! - Channel lifecycle and local send failures, reported by the runtime.

use relay_client::TransportEvent;
use relay_proto::ServerMessage;

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Decoded inbound message, including unknown types.
    Server(ServerMessage),

    /// Inbound frame that could not be decoded.
    DecodeFailed {
        /// Decode error text.
        message: String,
    },

    /// A read failed; the transport is reconnecting.
    ConnectionLost,

    /// The transport reconnected.
    Reconnected,

    /// The channel is permanently closed.
    Disconnected,

    /// An envelope could not be sent.
    SendFailed {
        /// Failure reason.
        message: String,
    },
}

impl AppEvent {
    /// Decode one inbound frame into an event.
    ///
    /// Never fails: malformed frames become [`AppEvent::DecodeFailed`].
    pub fn from_frame(bytes: &[u8]) -> Self {
        match relay_proto::decode(bytes) {
            Ok(message) => Self::Server(message),
            Err(e) => Self::DecodeFailed { message: e.to_string() },
        }
    }
}

impl From<TransportEvent> for AppEvent {
    fn from(event: TransportEvent) -> Self {
        match event {
            TransportEvent::Frame(bytes) => Self::from_frame(&bytes),
            TransportEvent::ConnectionLost => Self::ConnectionLost,
            TransportEvent::Reconnected => Self::Reconnected,
            TransportEvent::SendFailed(message) => Self::SendFailed { message },
        }
    }
}
