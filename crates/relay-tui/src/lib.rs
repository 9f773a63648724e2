//! Terminal UI for the relay client
//!
//! A thin shell over [`relay_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`relay_app::Runtime`].
//!
//! This crate handles terminal rendering, the REST session bootstrap that
//! runs before the channel opens, saved server profiles, and log setup for
//! the binary.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod bootstrap;
pub mod config;
pub mod logging;
pub mod servers;
pub mod terminal;
pub mod theme;
pub mod ui;

pub use bootstrap::{BootstrapError, Health, RestBootstrap, Session, SessionBootstrap};
pub use config::{Config, ConfigError, ServerProfile};
pub use relay_app::{App, AppAction, AppEvent, Driver, KeyInput, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
pub use theme::Theme;
