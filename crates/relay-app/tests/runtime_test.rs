//! Runtime tests with a simulated driver and an in-memory channel.
//!
//! The driver replays a script of key events and pauses; the channel is fed
//! through an unbounded queue and records every frame the runtime sends.
//! Tests run on a paused clock so pauses cost nothing.

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use relay_app::{App, AppEvent, Channel, ChatEntry, Driver, KeyInput, Role, Runtime, RuntimeError};
use relay_client::{TransportError, TransportEvent};
use thiserror::Error;
use tokio::{sync::mpsc, time::Instant};

const SESSION: &str = "sess-rt";

#[derive(Debug, Error)]
#[error("simulated render failure")]
struct SimError;

enum Step {
    Event(AppEvent),
    Pause(Duration),
    PauseUntil(Instant),
}

/// Scripted driver. An exhausted script ends input.
#[derive(Default)]
struct SimDriver {
    script: VecDeque<Step>,
    renders: usize,
    fail_render_at: Option<usize>,
    stopped: bool,
    last_frame: Option<App>,
}

impl SimDriver {
    fn new() -> Self {
        Self::default()
    }

    fn pause(mut self, millis: u64) -> Self {
        self.script.push_back(Step::Pause(Duration::from_millis(millis)));
        self
    }

    fn key(mut self, key: KeyInput) -> Self {
        self.script.push_back(Step::Event(AppEvent::Key(key)));
        self
    }

    fn submit(mut self, text: &str) -> Self {
        for c in text.chars() {
            self = self.key(KeyInput::Char(c));
        }
        self.key(KeyInput::Enter)
    }
}

impl Driver for SimDriver {
    type Error = SimError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, SimError> {
        // Pauses are turned into deadlines in place so a cancelled poll
        // resumes the same pause.
        loop {
            let Some(step) = self.script.front_mut() else {
                return Ok(None);
            };
            match *step {
                Step::Pause(delay) => *step = Step::PauseUntil(Instant::now() + delay),
                Step::PauseUntil(deadline) => {
                    tokio::time::sleep_until(deadline).await;
                    self.script.pop_front();
                },
                Step::Event(_) => {
                    if let Some(Step::Event(event)) = self.script.pop_front() {
                        return Ok(Some(event));
                    }
                },
            }
        }
    }

    fn render(&mut self, app: &App) -> Result<(), SimError> {
        if self.fail_render_at == Some(self.renders) {
            return Err(SimError);
        }
        self.renders += 1;
        self.last_frame = Some(app.clone());
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

/// Channel over an in-memory queue.
struct MemoryChannel {
    inbound: mpsc::UnboundedReceiver<TransportEvent>,
    sent: Arc<Mutex<Vec<String>>>,
    connected: Arc<AtomicBool>,
    closes: Arc<AtomicUsize>,
}

/// Test-side handle to a [`MemoryChannel`].
#[derive(Clone)]
struct Server {
    to_client: mpsc::UnboundedSender<TransportEvent>,
    sent: Arc<Mutex<Vec<String>>>,
    connected: Arc<AtomicBool>,
    closes: Arc<AtomicUsize>,
}

impl Server {
    fn push(&self, frame: &str) {
        self.to_client.send(TransportEvent::Frame(frame.to_owned().into())).unwrap();
    }

    fn lifecycle(&self, event: TransportEvent) {
        self.to_client.send(event).unwrap();
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

fn memory_channel() -> (MemoryChannel, Server) {
    let (to_client, inbound) = mpsc::unbounded_channel();
    let sent = Arc::new(Mutex::new(Vec::new()));
    let connected = Arc::new(AtomicBool::new(true));
    let closes = Arc::new(AtomicUsize::new(0));

    let channel = MemoryChannel {
        inbound,
        sent: Arc::clone(&sent),
        connected: Arc::clone(&connected),
        closes: Arc::clone(&closes),
    };
    (channel, Server { to_client, sent, connected, closes })
}

impl Channel for MemoryChannel {
    async fn recv(&mut self) -> Option<TransportEvent> {
        self.inbound.recv().await
    }

    fn send(&self, text: &str) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::NotConnected);
        }
        self.sent.lock().unwrap().push(text.to_owned());
        Ok(())
    }

    async fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inbound.close();
    }
}

fn runtime(driver: SimDriver) -> (Runtime<SimDriver, MemoryChannel>, Server) {
    let (channel, server) = memory_channel();
    (Runtime::new(driver, channel, App::new(SESSION)), server)
}

#[tokio::test(start_paused = true)]
async fn frames_fold_in_order_then_quit_closes_channel() {
    let (mut runtime, server) = runtime(SimDriver::new().pause(50).submit("/quit"));
    server.push(r#"{"type":"assistant_chunk","content":"Hello","seq":1}"#);
    server.push(r#"{"type":"assistant_chunk","content":" world","seq":2}"#);
    server.push(r#"{"type":"assistant_message","content":"","seq":3}"#);

    runtime.run().await.unwrap();

    let app = runtime.app();
    assert_eq!(app.entries(), [ChatEntry::new(Role::Assistant, "Hello world")]);
    assert_eq!(app.stream_buffer(), "");
    assert!(app.is_quitting());
    assert_eq!(server.closes(), 1);
    assert!(runtime.driver().stopped);
}

#[tokio::test(start_paused = true)]
async fn submitted_text_is_encoded_and_sent() {
    let (mut runtime, server) = runtime(SimDriver::new().submit("hello").key(KeyInput::Quit));

    runtime.run().await.unwrap();

    assert_eq!(server.sent(), [r#"{"type":"user_message","sessionId":"sess-rt","text":"hello"}"#]);
    assert_eq!(runtime.app().entries(), [ChatEntry::new(Role::User, "hello")]);
}

#[tokio::test(start_paused = true)]
async fn permission_answer_is_sent() {
    let (mut runtime, server) =
        runtime(SimDriver::new().pause(50).key(KeyInput::Char('n')).key(KeyInput::Quit));
    server.push(r#"{"type":"permission_request","requestId":"r-1","toolName":"bash"}"#);

    runtime.run().await.unwrap();

    assert_eq!(server.sent(), [
        r#"{"type":"permission_response","sessionId":"sess-rt","requestId":"r-1","allowed":false}"#
    ]);
    assert_eq!(runtime.app().entries(), [ChatEntry::new(Role::Error, "Denied: bash")]);
}

#[tokio::test(start_paused = true)]
async fn local_send_failure_becomes_error_entry() {
    let (mut runtime, server) = runtime(SimDriver::new().submit("hi").key(KeyInput::Quit));
    server.connected.store(false, Ordering::SeqCst);

    runtime.run().await.unwrap();

    assert!(server.sent().is_empty());
    assert_eq!(runtime.app().entries(), [
        ChatEntry::new(Role::User, "hi"),
        ChatEntry::new(Role::Error, "Send failed: not connected"),
    ]);
}

#[tokio::test(start_paused = true)]
async fn late_write_failure_becomes_error_entry() {
    let (mut runtime, server) =
        runtime(SimDriver::new().submit("hi").pause(50).key(KeyInput::Quit));
    let writer = server.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(25)).await;
        writer.lifecycle(TransportEvent::SendFailed("write failed: broken pipe".into()));
    });

    runtime.run().await.unwrap();

    assert_eq!(server.sent().len(), 1);
    assert_eq!(runtime.app().entries(), [
        ChatEntry::new(Role::User, "hi"),
        ChatEntry::new(Role::Error, "Send failed: write failed: broken pipe"),
    ]);
}

#[tokio::test(start_paused = true)]
async fn lifecycle_events_toggle_indicator() {
    let (mut runtime, server) = runtime(SimDriver::new().pause(50).key(KeyInput::Quit));
    server.lifecycle(TransportEvent::ConnectionLost);
    server.lifecycle(TransportEvent::Reconnected);
    server.lifecycle(TransportEvent::ConnectionLost);

    runtime.run().await.unwrap();

    assert!(!runtime.app().is_connected());
    let last = runtime.driver().last_frame.as_ref().unwrap();
    assert!(!last.is_connected());
}

#[tokio::test(start_paused = true)]
async fn permanent_close_keeps_loop_alive() {
    let (mut runtime, server) = runtime(SimDriver::new().pause(50).submit("/help").pause(50));
    server.push(r#"{"type":"assistant_message","content":"before"}"#);
    let closes = Arc::clone(&server.closes);
    drop(server);

    // Input exhaustion after the script acts as quit.
    runtime.run().await.unwrap();

    let app = runtime.app();
    assert!(!app.is_connected());
    assert_eq!(app.entries().len(), 2);
    assert_eq!(app.entries()[0], ChatEntry::new(Role::Assistant, "before"));
    assert_eq!(app.entries()[1].role, Role::Assistant);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn bad_frames_do_not_stop_the_loop() {
    let (mut runtime, server) = runtime(SimDriver::new().pause(50).key(KeyInput::Quit));
    server.push("garbage");
    server.push(r#"{"type":"mystery"}"#);
    server.push(r#"{"type":"assistant_message","content":"still here"}"#);

    runtime.run().await.unwrap();

    let entries = runtime.app().entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1], ChatEntry::new(Role::Error, "unknown message type: mystery"));
    assert_eq!(entries[2], ChatEntry::new(Role::Assistant, "still here"));
}

#[tokio::test(start_paused = true)]
async fn render_failure_still_closes_channel() {
    let driver = SimDriver { fail_render_at: Some(1), ..SimDriver::new().submit("x") };
    let (mut runtime, server) = runtime(driver);

    let result = runtime.run().await;

    assert!(matches!(result, Err(RuntimeError::Render(SimError))));
    assert_eq!(server.closes(), 1);
    assert!(runtime.driver().stopped);
}
