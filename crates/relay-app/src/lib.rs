//! Application layer for the relay client
//!
//! Pure state machine and generic runtime for the interactive session, so the
//! same orchestration code runs in the terminal and in simulation tests.
//!
//! # Components
//!
//! - [`App`]: conversation state machine (draft editing, slash commands,
//!   permission prompts, inbound frame folding)
//! - [`Driver`]: trait for platform-specific input and rendering
//! - [`Channel`]: trait for the persistent server channel
//! - [`Runtime`]: generic event loop merging input and channel events
//!
//! # Invariants
//!
//! - Entries are append-only.
//! - The stream buffer is folded into exactly one assistant entry per
//!   finalizing message and is empty afterwards.
//! - While a permission request is pending only `y`/`Y`/`n`/`N` (and the
//!   quit shortcut) have any effect.
//! - Events are folded one at a time, in arrival order.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod channel;
mod command;
mod draft;
mod driver;
mod event;
mod input;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::{App, HELP_TEXT};
pub use channel::Channel;
pub use draft::Draft;
pub use driver::Driver;
pub use event::AppEvent;
pub use input::KeyInput;
pub use runtime::{Runtime, RuntimeError};
pub use state::{ChatEntry, Role};
