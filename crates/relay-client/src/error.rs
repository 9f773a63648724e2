//! Transport errors.

use thiserror::Error;

/// Errors surfaced by the transport.
///
/// Read failures never reach callers as errors; the reader task turns them
/// into reconnection attempts and [`crate::TransportEvent`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Base address could not be turned into a channel URL.
    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    /// Handshake failed.
    #[error("connection failed: {0}")]
    Connect(String),

    /// No live connection (not yet connected, reconnecting, or closed).
    #[error("not connected")]
    NotConnected,

    /// Too many frames are waiting to be written.
    #[error("send queue full")]
    Backlogged,

    /// Writing a frame failed.
    #[error("write failed: {0}")]
    Write(String),

    /// Reading a frame failed.
    #[error("read failed: {0}")]
    Read(String),
}
