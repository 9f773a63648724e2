//! Fuzz target for folding arbitrary frames and keys into the App
//!
//! # Invariants
//!
//! - NEVER panic
//! - Entries are append-only
//! - Every outbound envelope carries the session id

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use relay_app::{App, AppAction, AppEvent, KeyInput};

const SESSION: &str = "fuzz-session";

#[derive(Debug, Clone, Arbitrary)]
enum Input {
    Frame(Vec<u8>),
    Char(char),
    Enter,
    Backspace,
    Interrupt,
    ConnectionLost,
    Reconnected,
}

impl Input {
    fn into_event(self) -> AppEvent {
        match self {
            Self::Frame(bytes) => AppEvent::from_frame(&bytes),
            Self::Char(c) => AppEvent::Key(KeyInput::Char(c)),
            Self::Enter => AppEvent::Key(KeyInput::Enter),
            Self::Backspace => AppEvent::Key(KeyInput::Backspace),
            Self::Interrupt => AppEvent::Key(KeyInput::Interrupt),
            Self::ConnectionLost => AppEvent::ConnectionLost,
            Self::Reconnected => AppEvent::Reconnected,
        }
    }
}

fuzz_target!(|inputs: Vec<Input>| {
    let mut app = App::new(SESSION);

    for input in inputs {
        let before = app.entries().to_vec();

        for action in app.handle(input.into_event()) {
            if let AppAction::Send(message) = action {
                assert_eq!(message.session_id(), SESSION);
            }
        }

        assert!(app.entries().starts_with(&before));
    }
});
