//! Generic runtime for application orchestration.
//!
//! The Runtime drives the event loop, coordinating between:
//! - [`App`]: conversation state machine
//! - [`Driver`]: user input and rendering
//! - [`Channel`]: the persistent server channel
//!
//! Input and channel events are merged with `tokio::select!` and folded one at
//! a time. Exactly one channel read is outstanding at any moment, so frames
//! reach the fold strictly in arrival order. Folding never awaits: sends only
//! enqueue, so a slow socket cannot hold up input.

use std::collections::VecDeque;

use relay_proto::ClientMessage;
use thiserror::Error;

use crate::{App, AppAction, AppEvent, Channel, Driver, KeyInput};

/// Runtime errors. Only the driver can fail the loop; channel and codec
/// failures are folded into the conversation instead.
#[derive(Debug, Error)]
pub enum RuntimeError<E>
where
    E: std::error::Error + 'static,
{
    /// Reading user input failed.
    #[error("input failed: {0}")]
    Input(#[source] E),

    /// Rendering failed.
    #[error("render failed: {0}")]
    Render(#[source] E),
}

/// Generic runtime that orchestrates App, Driver, and Channel.
///
/// # Type Parameters
///
/// - `D`: platform-specific input and rendering
/// - `C`: server channel
pub struct Runtime<D, C>
where
    D: Driver,
    C: Channel,
{
    driver: D,
    channel: C,
    app: App,
    /// Cleared once the channel reports permanent closure.
    channel_open: bool,
}

impl<D, C> Runtime<D, C>
where
    D: Driver,
    C: Channel,
{
    /// Create a runtime over an already-connected channel.
    pub fn new(driver: D, channel: C, app: App) -> Self {
        Self { driver, channel, app, channel_open: true }
    }

    /// Run the event loop until the quit sequence completes.
    ///
    /// The channel is closed and the driver stopped on every exit path,
    /// including errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to read input or render.
    pub async fn run(&mut self) -> Result<(), RuntimeError<D::Error>> {
        tracing::info!(session_id = self.app.session_id(), "runtime started");

        let result = self.event_loop().await;

        self.channel.close().await;
        self.driver.stop();

        match &result {
            Ok(()) => tracing::info!("runtime stopped"),
            Err(e) => tracing::error!("runtime failed: {e}"),
        }
        result
    }

    async fn event_loop(&mut self) -> Result<(), RuntimeError<D::Error>> {
        self.driver.render(&self.app).map_err(RuntimeError::Render)?;

        loop {
            let event = tokio::select! {
                input = self.driver.poll_event() => {
                    // An exhausted input source behaves like the quit shortcut.
                    input.map_err(RuntimeError::Input)?.unwrap_or(AppEvent::Key(KeyInput::Quit))
                }

                inbound = self.channel.recv(), if self.channel_open => match inbound {
                    Some(event) => AppEvent::from(event),
                    None => {
                        tracing::warn!("channel closed permanently");
                        self.channel_open = false;
                        AppEvent::Disconnected
                    },
                },
            };

            if self.dispatch(event)? {
                return Ok(());
            }
        }
    }

    /// Fold an event and execute the resulting actions.
    ///
    /// Send failures are fed back as further events, processed iteratively.
    /// Returns `true` once the quit sequence has begun.
    fn dispatch(&mut self, event: AppEvent) -> Result<bool, RuntimeError<D::Error>> {
        let mut pending = VecDeque::from([event]);

        while let Some(event) = pending.pop_front() {
            log_event(&event);

            for action in self.app.handle(event) {
                match action {
                    AppAction::Render => {
                        self.driver.render(&self.app).map_err(RuntimeError::Render)?;
                    },
                    AppAction::Quit => {
                        tracing::info!("quit requested");
                        return Ok(true);
                    },
                    AppAction::Send(message) => {
                        if let Err(reason) = self.send(&message) {
                            pending.push_back(AppEvent::SendFailed { message: reason });
                        }
                    },
                }
            }
        }

        Ok(false)
    }

    /// Encode and enqueue one envelope. Returns the failure reason, if any.
    fn send(&self, message: &ClientMessage) -> Result<(), String> {
        let text = relay_proto::encode(message).map_err(|e| e.to_string())?;

        match self.channel.send(&text) {
            Ok(()) => {
                tracing::debug!(message_type = message.message_type(), "queued");
                Ok(())
            },
            Err(e) => {
                tracing::warn!(message_type = message.message_type(), "send failed: {e}");
                Err(e.to_string())
            },
        }
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}

fn log_event(event: &AppEvent) {
    match event {
        AppEvent::Server(message) => {
            tracing::debug!(message_type = message.message_type(), "inbound message");
        },
        AppEvent::DecodeFailed { message } => tracing::warn!("undecodable frame: {message}"),
        AppEvent::ConnectionLost => tracing::info!("connection lost"),
        AppEvent::Reconnected => tracing::info!("reconnected"),
        AppEvent::Disconnected => tracing::info!("disconnected"),
        AppEvent::SendFailed { .. } | AppEvent::Key(_) | AppEvent::Resize(..) => {},
    }
}
