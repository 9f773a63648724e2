//! Connection ownership, inbound queue, and reconnection.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::{
    sync::{
        Mutex,
        mpsc::{self, error::TrySendError},
    },
    task::JoinHandle,
};
use tokio_tungstenite::tungstenite::{
    Message,
    protocol::{CloseFrame, frame::coding::CloseCode},
};

use crate::{Backoff, Dialer, FrameSink, FrameStream, ReconnectPolicy, TransportError};

/// Inbound queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Outbound queue capacity.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 32;

/// Transport configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Reconnect schedule applied to every failure episode.
    pub reconnect: ReconnectPolicy,
    /// Bound on buffered inbound events.
    pub queue_capacity: usize,
    /// Bound on frames accepted by [`Transport::send`] but not yet written.
    pub outbound_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            reconnect: ReconnectPolicy::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
        }
    }
}

/// Events delivered by [`Transport::recv`], in receipt order.
///
/// The queue ending (`recv` returning `None`) is the permanent disconnect
/// signal: reconnection was exhausted or [`Transport::close`] was called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// One frame as received. No dedup, no filtering.
    Frame(Bytes),
    /// A read failed; reconnection has started.
    ConnectionLost,
    /// Reconnection succeeded; frames resume.
    Reconnected,
    /// A frame accepted by [`Transport::send`] could not be written.
    SendFailed(String),
}

/// State shared between the caller, the reader task, and the writer task.
struct Shared {
    /// Write half of the live connection. `None` while disconnected.
    ///
    /// Held only for the duration of one write or one swap, and never by
    /// the caller.
    sink: Mutex<Option<FrameSink>>,
    /// Cleared as soon as a read fails, set again after a reconnect.
    connected: AtomicBool,
}

/// Handle to the persistent channel.
///
/// Dropping the handle stops both background tasks without a close
/// handshake; call [`Transport::close`] for a graceful shutdown.
pub struct Transport {
    shared: Arc<Shared>,
    events: mpsc::Receiver<TransportEvent>,
    outbound: mpsc::Sender<String>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
    closed: bool,
}

impl Transport {
    /// Perform the initial handshake and start the reader and writer tasks.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the dialer's error if the first handshake fails. No retry is
    /// attempted for the initial connection.
    pub async fn connect<D: Dialer>(
        dialer: D,
        url: impl Into<String>,
        config: TransportConfig,
    ) -> Result<Self, TransportError> {
        let url = url.into();
        let (sink, stream) = dialer.dial(&url).await?;
        tracing::info!("channel connected");

        let shared =
            Arc::new(Shared { sink: Mutex::new(Some(sink)), connected: AtomicBool::new(true) });
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let (outbound, pending) = mpsc::channel(config.outbound_capacity.max(1));

        // The writer only holds a weak handle so the queue still ends when
        // the reader gives up.
        let writer = tokio::spawn(write_loop(Arc::clone(&shared), pending, tx.downgrade()));
        let reader = tokio::spawn(read_loop(ReadLoop {
            dialer,
            url,
            policy: config.reconnect,
            shared: Arc::clone(&shared),
            events: tx,
            stream,
        }));

        Ok(Self { shared, events: rx, outbound, reader, writer, closed: false })
    }

    /// Next inbound event. `None` once the channel is permanently closed.
    pub async fn recv(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }

    /// Queue one text frame for the writer task. Never waits.
    ///
    /// Frames are written in the order they were accepted. A write that
    /// fails later is reported as [`TransportEvent::SendFailed`].
    ///
    /// # Errors
    ///
    /// - [`TransportError::NotConnected`] while disconnected or closed;
    ///   nothing is queued.
    /// - [`TransportError::Backlogged`] if the outbound queue is full.
    pub fn send(&self, text: &str) -> Result<(), TransportError> {
        if self.closed || !self.shared.connected.load(Ordering::Acquire) {
            return Err(TransportError::NotConnected);
        }

        self.outbound.try_send(text.to_owned()).map_err(|e| match e {
            TrySendError::Full(_) => TransportError::Backlogged,
            TrySendError::Closed(_) => TransportError::NotConnected,
        })
    }

    /// Close the channel.
    ///
    /// Stops any pending reconnection, attempts a normal close handshake, and
    /// releases the connection. Idempotent.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        // Abort first so a reconnect in flight cannot install a new sink.
        self.shared.connected.store(false, Ordering::Release);
        self.reader.abort();
        self.writer.abort();

        let sink = self.shared.sink.lock().await.take();
        if let Some(mut sink) = sink {
            let frame = CloseFrame { code: CloseCode::Normal, reason: "".into() };
            if let Err(e) = sink.send(Message::Close(Some(frame))).await {
                tracing::debug!("close frame not delivered: {e}");
            }
            if let Err(e) = sink.close().await {
                tracing::debug!("close failed: {e}");
            }
        }

        tracing::info!("channel closed");
    }

    /// Whether [`Transport::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}

/// Everything the reader task owns.
struct ReadLoop<D> {
    dialer: D,
    url: String,
    policy: ReconnectPolicy,
    shared: Arc<Shared>,
    events: mpsc::Sender<TransportEvent>,
    stream: FrameStream,
}

/// Forward frames until the channel is closed or reconnection is exhausted.
///
/// Returning drops the event sender, which ends the caller's queue.
async fn read_loop<D: Dialer>(mut state: ReadLoop<D>) {
    loop {
        let failure = match state.stream.next().await {
            Some(Ok(Message::Text(text))) => {
                if forward(&state.events, TransportEvent::Frame(Bytes::from(text))).await {
                    continue;
                }
                return;
            },
            Some(Ok(Message::Binary(data))) => {
                if forward(&state.events, TransportEvent::Frame(Bytes::from(data))).await {
                    continue;
                }
                return;
            },
            Some(Ok(Message::Close(_))) => "closed by server".to_string(),
            Some(Ok(_)) => continue,
            Some(Err(e)) => e.to_string(),
            None => "stream ended".to_string(),
        };

        tracing::warn!("channel read failed: {failure}");
        state.shared.connected.store(false, Ordering::Release);
        state.shared.sink.lock().await.take();

        if !forward(&state.events, TransportEvent::ConnectionLost).await {
            return;
        }

        let Some((sink, stream)) = reconnect(&state.dialer, &state.url, state.policy).await else {
            tracing::warn!(attempts = state.policy.max_attempts, "reconnection exhausted");
            return;
        };

        *state.shared.sink.lock().await = Some(sink);
        state.shared.connected.store(true, Ordering::Release);
        state.stream = stream;

        if !forward(&state.events, TransportEvent::Reconnected).await {
            return;
        }
    }
}

/// Write queued frames in order until the transport is dropped or closed.
///
/// Failures go back through the event queue so they surface in order with
/// inbound frames.
async fn write_loop(
    shared: Arc<Shared>,
    mut pending: mpsc::Receiver<String>,
    events: mpsc::WeakSender<TransportEvent>,
) {
    while let Some(text) = pending.recv().await {
        let result = {
            let mut guard = shared.sink.lock().await;
            match guard.as_mut() {
                Some(sink) => sink.send(Message::text(text)).await,
                None => Err(TransportError::NotConnected),
            }
        };

        if let Err(e) = result {
            tracing::warn!("channel write failed: {e}");
            let Some(events) = events.upgrade() else {
                return;
            };
            if !forward(&events, TransportEvent::SendFailed(e.to_string())).await {
                return;
            }
        }
    }
}

/// Run one backoff episode. `None` if every attempt failed.
async fn reconnect<D: Dialer>(
    dialer: &D,
    url: &str,
    policy: ReconnectPolicy,
) -> Option<(FrameSink, FrameStream)> {
    let mut backoff = Backoff::new(policy);

    while let Some(delay) = backoff.next() {
        let attempt = backoff.attempts();
        tracing::info!(attempt, delay_ms = delay.as_millis() as u64, "reconnecting");
        tokio::time::sleep(delay).await;

        match dialer.dial(url).await {
            Ok(halves) => {
                tracing::info!(attempt, "reconnected");
                return Some(halves);
            },
            Err(e) => tracing::warn!(attempt, "reconnect failed: {e}"),
        }
    }

    None
}

/// Push an event to the caller. `false` if the caller is gone.
async fn forward(events: &mpsc::Sender<TransportEvent>, event: TransportEvent) -> bool {
    events.send(event).await.is_ok()
}
