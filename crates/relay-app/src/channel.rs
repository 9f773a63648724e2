//! Server channel seam.

use std::future::Future;

use relay_client::{Transport, TransportError, TransportEvent};

/// The persistent server channel as seen by the [`crate::Runtime`].
///
/// Production uses [`Transport`]; tests substitute an in-memory channel.
pub trait Channel: Send {
    /// Next inbound event. `None` once the channel is permanently closed.
    ///
    /// Must be cancel-safe: the runtime drops this future whenever user input
    /// wins the race.
    fn recv(&mut self) -> impl Future<Output = Option<TransportEvent>> + Send;

    /// Hand one encoded envelope to the channel without waiting on the
    /// network. Later write failures arrive through [`Channel::recv`].
    ///
    /// # Errors
    ///
    /// Fails immediately when there is no live connection or the outbound
    /// queue is full.
    fn send(&self, text: &str) -> Result<(), TransportError>;

    /// Close the channel. Idempotent.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

impl Channel for Transport {
    fn recv(&mut self) -> impl Future<Output = Option<TransportEvent>> + Send {
        Transport::recv(self)
    }

    fn send(&self, text: &str) -> Result<(), TransportError> {
        Transport::send(self, text)
    }

    fn close(&mut self) -> impl Future<Output = ()> + Send {
        Transport::close(self)
    }
}
