//! Client transport
//!
//! Owns the persistent websocket channel to the relay server: the initial
//! handshake, failure detection, and bounded reconnection. Callers see a
//! queue of [`TransportEvent`]s and a non-blocking [`Transport::send`].
//!
//! # Architecture
//!
//! The write half of the connection is the only state shared between tasks.
//! It lives behind one lock inside [`Transport`] and is never handed out. A
//! writer task drains a bounded outbound queue into it, so callers never
//! wait on the socket. A background reader task owns the read half, forwards frames in receipt
//! order, and on any read failure drives the [`Backoff`] schedule through a
//! [`Dialer`]. Production uses [`WsDialer`]; tests swap in an in-memory
//! dialer and a paused clock.
//!
//! # Components
//!
//! - [`channel_url`]: Base address to channel URL with the auth token
//! - [`ReconnectPolicy`] / [`Backoff`]: Pure reconnect delay schedule
//! - [`Dialer`]: Capability to open the channel
//! - [`Transport`]: Connect, receive, send, close

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod backoff;
mod channel_url;
mod dialer;
mod error;
mod transport;

pub use backoff::{
    Backoff, DEFAULT_INITIAL_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY, ReconnectPolicy,
};
pub use channel_url::{CHANNEL_PATH, channel_url};
pub use dialer::{Dialer, FrameSink, FrameStream, WsDialer};
pub use error::TransportError;
pub use tokio_tungstenite::tungstenite::Message;
pub use transport::{
    DEFAULT_OUTBOUND_CAPACITY, DEFAULT_QUEUE_CAPACITY, Transport, TransportConfig, TransportEvent,
};
