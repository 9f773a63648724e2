//! Opening the physical channel.

use std::{future::Future, pin::Pin};

use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use crate::TransportError;

/// Write half of an open channel.
pub type FrameSink = Pin<Box<dyn Sink<Message, Error = TransportError> + Send>>;

/// Read half of an open channel.
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<Message, TransportError>> + Send>>;

/// Capability to open the channel.
///
/// Called once for the initial connect and again for every reconnect attempt,
/// always with the same URL (which already carries the credential).
pub trait Dialer: Send + Sync + 'static {
    /// Perform the handshake and return both halves of the connection.
    ///
    /// # Errors
    ///
    /// [`TransportError::Connect`] if the handshake fails.
    fn dial(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<(FrameSink, FrameStream), TransportError>> + Send;
}

/// Production dialer over `tokio-tungstenite` (TLS via rustls for `wss`).
#[derive(Debug, Clone, Copy, Default)]
pub struct WsDialer;

impl Dialer for WsDialer {
    async fn dial(&self, url: &str) -> Result<(FrameSink, FrameStream), TransportError> {
        let (ws_stream, response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        tracing::debug!(status = %response.status(), "websocket handshake complete");

        let (sink, stream) = ws_stream.split();
        let sink = sink.sink_map_err(|e| TransportError::Write(e.to_string()));
        let stream = stream.map(|item| item.map_err(|e| TransportError::Read(e.to_string())));

        Ok((Box::pin(sink), Box::pin(stream)))
    }
}
