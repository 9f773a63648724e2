//! Application side-effects.
//!
//! [`AppAction`] values are produced by the [`crate::App`] fold and executed
//! by the runtime. The fold itself never performs I/O.

use relay_proto::ClientMessage;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Redraw from the current state.
    Render,

    /// Begin the quit sequence: close the channel and stop the loop.
    Quit,

    /// Encode and send an envelope. Fire-and-forget; a local failure comes
    /// back as [`crate::AppEvent::SendFailed`].
    Send(ClientMessage),
}
