//! Application state machine.
//!
//! [`App`] is the single owner of conversation state. It consumes
//! [`crate::AppEvent`] inputs and produces [`crate::AppAction`] instructions
//! for the runtime to execute; it performs no I/O.
//!
//! # Regimes
//!
//! - **Normal**: keys edit the draft, Enter submits it (message or slash
//!   command), Ctrl+C interrupts a busy session or quits an idle one.
//! - **Awaiting permission**: only `y`/`Y` and `n`/`N` answer the request;
//!   every other key except the quit shortcut is ignored and the draft is
//!   left untouched.
//! - **Disconnected**: reflected in [`App::is_connected`]; folding rules are
//!   otherwise unchanged.

use relay_proto::{ClientMessage, PermissionRequest, ServerMessage, SessionStatus};

use crate::{AppAction, AppEvent, ChatEntry, Draft, KeyInput, Role, command::Command};

/// Static text appended by `/help`.
pub const HELP_TEXT: &str = "Available commands:
  /help   - Show this help
  /reset  - Reset the current session
  /quit   - Exit the application

Shortcuts:
  Ctrl+C  - Interrupt current operation
  Ctrl+D  - Quit";

/// Entry appended by `/reset`.
const RESET_NOTICE: &str = "Session reset requested";

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies, fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Session every outbound envelope is addressed to.
    session_id: String,
    /// Conversation history. Append-only.
    entries: Vec<ChatEntry>,
    /// Assistant text streamed for the in-progress turn.
    stream_buffer: String,
    /// Live channel indicator.
    connected: bool,
    /// Last reported session status.
    status: SessionStatus,
    /// Outstanding permission request. Last request wins.
    pending_permission: Option<PermissionRequest>,
    /// Message being composed.
    draft: Draft,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Set once the quit sequence begins; all later events are inert.
    quitting: bool,
}

impl App {
    /// Create the state for a session whose channel is already open.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            entries: Vec::new(),
            stream_buffer: String::new(),
            connected: true,
            status: SessionStatus::Ready,
            pending_permission: None,
            draft: Draft::new(),
            terminal_size: (80, 24),
            quitting: false,
        }
    }

    /// Fold one event into the state and return the resulting actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        if self.quitting {
            return vec![];
        }

        match event {
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Server(message) => self.handle_server(message),
            AppEvent::DecodeFailed { message } => self.append(Role::Error, message),
            AppEvent::ConnectionLost | AppEvent::Disconnected => {
                self.connected = false;
                vec![AppAction::Render]
            },
            AppEvent::Reconnected => {
                self.connected = true;
                vec![AppAction::Render]
            },
            AppEvent::SendFailed { message } => {
                self.append(Role::Error, format!("Send failed: {message}"))
            },
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if key == KeyInput::Quit {
            return self.quit();
        }
        if self.pending_permission.is_some() {
            return self.handle_permission_key(key);
        }

        match key {
            KeyInput::Interrupt => {
                if self.status == SessionStatus::Busy {
                    vec![AppAction::Send(ClientMessage::interrupt(&self.session_id))]
                } else {
                    self.quit()
                }
            },
            KeyInput::Enter => self.submit(),
            KeyInput::Char(c) => self.edit(|draft| draft.insert(c)),
            KeyInput::Backspace => self.edit(Draft::backspace),
            KeyInput::Delete => self.edit(Draft::delete),
            KeyInput::Left => self.edit(Draft::move_left),
            KeyInput::Right => self.edit(Draft::move_right),
            KeyInput::Home => self.edit(Draft::move_home),
            KeyInput::End => self.edit(Draft::move_end),
            KeyInput::Up | KeyInput::Down | KeyInput::Tab | KeyInput::Esc | KeyInput::Quit => {
                vec![]
            },
        }
    }

    fn edit(&mut self, f: impl FnOnce(&mut Draft)) -> Vec<AppAction> {
        f(&mut self.draft);
        vec![AppAction::Render]
    }

    fn submit(&mut self) -> Vec<AppAction> {
        let text = self.draft.text().trim().to_string();
        if text.is_empty() {
            return vec![];
        }
        self.draft.clear();

        match Command::parse(&text) {
            Some(Command::Quit) => self.quit(),
            Some(Command::Reset) => {
                self.entries.push(ChatEntry::new(Role::Error, RESET_NOTICE));
                vec![
                    AppAction::Send(ClientMessage::reset_session(&self.session_id)),
                    AppAction::Render,
                ]
            },
            Some(Command::Help) => self.append(Role::Assistant, HELP_TEXT),
            None => {
                let message = ClientMessage::user_message(&self.session_id, text.clone());
                self.entries.push(ChatEntry::new(Role::User, text));
                vec![AppAction::Send(message), AppAction::Render]
            },
        }
    }

    fn handle_permission_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        let allowed = match key {
            KeyInput::Char('y' | 'Y') => true,
            KeyInput::Char('n' | 'N') => false,
            _ => return vec![],
        };
        let Some(request) = self.pending_permission.take() else {
            return vec![];
        };

        let response =
            ClientMessage::permission_response(&self.session_id, &request.request_id, allowed);
        let entry = if allowed {
            ChatEntry::new(Role::Assistant, format!("Allowed: {}", request.tool_name))
        } else {
            ChatEntry::new(Role::Error, format!("Denied: {}", request.tool_name))
        };
        self.entries.push(entry);

        vec![AppAction::Send(response), AppAction::Render]
    }

    fn handle_server(&mut self, message: ServerMessage) -> Vec<AppAction> {
        match message {
            ServerMessage::AssistantChunk(chunk) => {
                self.stream_buffer.push_str(&chunk.content);
                vec![AppAction::Render]
            },
            ServerMessage::AssistantMessage(message) => {
                let streamed = std::mem::take(&mut self.stream_buffer);
                let content = if message.content.is_empty() { streamed } else { message.content };
                self.append(Role::Assistant, content)
            },
            ServerMessage::PermissionRequest(request) => {
                self.pending_permission = Some(request);
                vec![AppAction::Render]
            },
            ServerMessage::SessionState(state) => {
                self.status = state.status;
                vec![AppAction::Render]
            },
            ServerMessage::Result(result) => match result.failure_text() {
                Some(error) => self.append(Role::Error, error.to_string()),
                None => vec![],
            },
            ServerMessage::Unknown { message_type } => {
                self.append(Role::Error, format!("unknown message type: {message_type}"))
            },
        }
    }

    fn append(&mut self, role: Role, content: impl Into<String>) -> Vec<AppAction> {
        self.entries.push(ChatEntry::new(role, content));
        vec![AppAction::Render]
    }

    fn quit(&mut self) -> Vec<AppAction> {
        self.quitting = true;
        vec![AppAction::Quit]
    }

    /// Session every envelope is addressed to.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Conversation history in display order.
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    /// Assistant text streamed so far for the current turn.
    pub fn stream_buffer(&self) -> &str {
        &self.stream_buffer
    }

    /// Whether the channel is currently live.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Last reported session status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Outstanding permission request. `None` in the normal regime.
    pub fn pending_permission(&self) -> Option<&PermissionRequest> {
        self.pending_permission.as_ref()
    }

    /// Message being composed.
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Whether the quit sequence has begun.
    pub fn is_quitting(&self) -> bool {
        self.quitting
    }
}
