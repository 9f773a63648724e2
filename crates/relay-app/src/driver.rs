//! Driver trait for abstracting user-facing I/O.
//!
//! The [`Driver`] trait decouples the runtime from the terminal. The TUI
//! implements it with crossterm and ratatui; tests implement it with a
//! scripted key sequence and a render counter.

use std::future::Future;

use crate::{App, AppEvent};

/// Abstracts input and rendering for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration, so the same loop runs
/// in the terminal and in simulation.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next user event (key or resize).
    ///
    /// Returns `None` once the input source is exhausted, which the runtime
    /// treats as the quit shortcut. Must be cancel-safe: the runtime drops
    /// this future whenever a channel event wins the race.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Release driver resources. Called once when the loop exits.
    fn stop(&mut self);
}
