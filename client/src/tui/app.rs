//! Application state and event management for the taskboard TUI.
//!
//! This module contains the state the run loop owns and the logic that turns
//! input into store requests:
//!
//! - [`AppState`]: screens, board mode, input buffers, selection, the session
//!   and the local todo list
//! - [`Action`]: what a key press asks for, after authorization gates
//! - [`PendingRequest`] / [`Completion`]: a store request on its way to the
//!   backend and its answer on the way back
//! - [`TuiEvent`] and [`EventHandler`]: the async event loop
//! - [`Theme`] and [`Symbols`]: styling
//!
//! # Request flow
//!
//! ```text
//! key --> handle_key() --> Action --> dispatch() --> PendingRequest
//!                                                        |
//!                                         spawned task: execute()
//!                                                        |
//!          complete() <-- TuiEvent::Completed(Completion)
//! ```
//!
//! Only one request is in flight at a time. While `loading` is set every key
//! except Ctrl+C is dropped. Each request is tagged with the session
//! generation; logging out bumps the generation so a late answer for the
//! previous session is discarded rather than applied.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::backend::TodoBackend;
use crate::error::{Operation, StoreError, TuiError};
use crate::session::SessionManager;
use crate::store::{StoreRequest, StoreResponse, TodoStore};
use crate::types::{Todo, TodoPatch};

/// Which screen is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    /// Name entry, shown while logged out.
    #[default]
    Login,
    /// The todo list, shown while logged in.
    Board,
}

/// What the board is doing with keyboard input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BoardMode {
    /// Navigating the list.
    #[default]
    Browse,
    /// Typing the text of a new item.
    Compose,
    /// Replacing the text of an item the user authored.
    Edit { id: String },
}

/// A user intent produced by [`AppState::handle_key`].
///
/// Edit and delete actions are only ever produced for items the current
/// session authored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Login(String),
    Logout,
    Refresh,
    Add(String),
    Toggle(String),
    SaveEdit { id: String, text: String },
    Delete(String),
    Quit,
}

/// A store request tagged with the generation it was issued in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub generation: u64,
    pub request: StoreRequest,
}

impl PendingRequest {
    /// Sends the request and packages the answer for [`AppState::complete`].
    pub async fn execute(self, backend: Arc<dyn TodoBackend>) -> Completion {
        let operation = self.request.operation();
        let result = self.request.send(backend.as_ref()).await;
        Completion {
            generation: self.generation,
            operation,
            result,
        }
    }
}

/// The answer to a [`PendingRequest`].
#[derive(Debug)]
pub struct Completion {
    pub generation: u64,
    pub operation: Operation,
    pub result: Result<StoreResponse, StoreError>,
}

/// Color and modifier set for the TUI.
///
/// [`Theme::from_env`] honors the [NO_COLOR](https://no-color.org/)
/// convention.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub border: Style,
    pub border_focused: Style,
    pub label: Style,
    pub input_focused: Style,
    pub input_unfocused: Style,
    pub text_primary: Style,
    pub text_secondary: Style,
    pub text_muted: Style,

    /// Completed items.
    pub todo_done: Style,
    /// Open items.
    pub todo_open: Style,
    /// The highlighted row.
    pub selected: Style,
    /// The "by <author>" label.
    pub author: Style,
    /// The "view only" marker on items the session cannot edit.
    pub view_only: Style,

    pub notice_error: Style,
    pub loading: Style,
    pub key_hint: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::DarkGray),
            border_focused: Style::default().fg(Color::Cyan),
            label: Style::default().fg(Color::White),
            input_focused: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            input_unfocused: Style::default().fg(Color::Gray),
            text_primary: Style::default(),
            text_secondary: Style::default().fg(Color::Gray),
            text_muted: Style::default().fg(Color::DarkGray),

            todo_done: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::CROSSED_OUT),
            todo_open: Style::default(),
            selected: Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
            author: Style::default().fg(Color::Blue),
            view_only: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            notice_error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            loading: Style::default().fg(Color::Yellow),
            key_hint: Style::default().fg(Color::Cyan),
        }
    }
}

impl Theme {
    /// Theme using only modifiers, for terminals where color is disabled.
    #[must_use]
    pub fn monochrome() -> Self {
        Self {
            title: Style::default().add_modifier(Modifier::BOLD),
            border: Style::default(),
            border_focused: Style::default().add_modifier(Modifier::BOLD),
            label: Style::default(),
            input_focused: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            input_unfocused: Style::default().add_modifier(Modifier::DIM),
            text_primary: Style::default(),
            text_secondary: Style::default().add_modifier(Modifier::DIM),
            text_muted: Style::default().add_modifier(Modifier::DIM),

            todo_done: Style::default().add_modifier(Modifier::CROSSED_OUT),
            todo_open: Style::default(),
            selected: Style::default().add_modifier(Modifier::REVERSED),
            author: Style::default().add_modifier(Modifier::ITALIC),
            view_only: Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),

            notice_error: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            loading: Style::default().add_modifier(Modifier::ITALIC),
            key_hint: Style::default().add_modifier(Modifier::BOLD),
        }
    }

    /// [`Theme::monochrome`] if `NO_COLOR` is set, the default theme otherwise.
    #[must_use]
    pub fn from_env() -> Self {
        if std::env::var("NO_COLOR").is_ok() {
            Self::monochrome()
        } else {
            Self::default()
        }
    }
}

/// Symbol set for the TUI (unicode or ASCII).
#[derive(Debug, Clone, Copy)]
pub struct Symbols {
    /// Checkbox of a completed item.
    pub checked: &'static str,
    /// Checkbox of an open item.
    pub unchecked: &'static str,
    /// Marker in front of the selected row.
    pub pointer: &'static str,
    pub user: &'static str,
    pub failure: &'static str,
    /// Frames of the loading indicator.
    pub spinner: &'static [&'static str],
}

/// Unicode symbols for modern terminals.
pub const UNICODE_SYMBOLS: Symbols = Symbols {
    checked: "[✓]",
    unchecked: "[ ]",
    pointer: "▶",
    user: "●",
    failure: "✗",
    spinner: &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
};

/// Plain ASCII symbols for the Linux console and similar terminals.
pub const ASCII_SYMBOLS: Symbols = Symbols {
    checked: "[x]",
    unchecked: "[ ]",
    pointer: ">",
    user: "*",
    failure: "!",
    spinner: &["|", "/", "-", "\\"],
};

impl Symbols {
    /// ASCII symbols when `TERM` names a limited terminal (`linux`, `vt100`),
    /// unicode otherwise.
    #[must_use]
    pub fn detect() -> Self {
        if std::env::var("TERM")
            .map(|t| t.contains("linux") || t.contains("vt100"))
            .unwrap_or(false)
        {
            ASCII_SYMBOLS
        } else {
            UNICODE_SYMBOLS
        }
    }

    /// Spinner frame for the given tick count.
    #[must_use]
    pub fn spinner_frame(&self, tick: usize) -> &'static str {
        self.spinner[tick % self.spinner.len()]
    }
}

impl Default for Symbols {
    fn default() -> Self {
        Self::detect()
    }
}

/// Everything the run loop and the renderer need.
///
/// # State Machine
///
/// ```text
/// +-------+   login / restore    +-------+
/// | Login | -------------------> | Board |
/// +-------+ <------------------- +-------+
///                 logout
/// ```
///
/// On the board, `a` enters [`BoardMode::Compose`] and `e` enters
/// [`BoardMode::Edit`]; Enter submits, Esc goes back to browsing.
#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub mode: BoardMode,
    pub session: SessionManager,
    pub store: TodoStore,

    /// Name typed on the login screen.
    pub name_input: String,
    /// Text typed while composing or editing.
    pub input: String,
    /// Index of the highlighted row.
    pub selected: usize,

    /// A request is in flight.
    pub loading: bool,
    /// Error shown in the status bar until the next request.
    pub notice: Option<String>,
    /// Incremented on logout.
    pub generation: u64,

    pub should_quit: bool,
    /// Tick counter driving the spinner.
    pub ticks: usize,

    pub theme: Theme,
    pub symbols: Symbols,
}

impl AppState {
    /// Creates a logged-out state on the login screen.
    #[must_use]
    pub fn new(session: SessionManager, store: TodoStore) -> Self {
        Self {
            screen: Screen::Login,
            mode: BoardMode::Browse,
            session,
            store,
            name_input: String::new(),
            input: String::new(),
            selected: 0,
            loading: false,
            notice: None,
            generation: 0,
            should_quit: false,
            ticks: 0,
            theme: Theme::from_env(),
            symbols: Symbols::detect(),
        }
    }

    /// The highlighted item, if any.
    #[must_use]
    pub fn selected_todo(&self) -> Option<&Todo> {
        self.store.items().get(self.selected)
    }

    /// Advances animations.
    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    /// Restores a persisted session and, if there was one, asks for the list.
    pub fn restore(&mut self) -> Option<PendingRequest> {
        if !self.session.restore() {
            return None;
        }
        self.screen = Screen::Board;
        Some(self.begin(StoreRequest::List))
    }

    /// Maps a key press to an action, updating input buffers and selection
    /// along the way.
    ///
    /// Returns `None` for keys that only change local UI state, for keys that
    /// are not offered in the current context, and for every key but Ctrl+C
    /// while a request is in flight.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }
        if self.loading {
            debug!(code = ?key.code, "Key ignored while loading");
            return None;
        }

        match self.screen {
            Screen::Login => self.handle_login_key(key),
            Screen::Board => match self.mode {
                BoardMode::Browse => self.handle_browse_key(key),
                BoardMode::Compose | BoardMode::Edit { .. } => self.handle_input_key(key),
            },
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => Some(Action::Login(self.name_input.clone())),
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Backspace => {
                self.name_input.pop();
                None
            }
            KeyCode::Char(c) => {
                self.name_input.push(c);
                None
            }
            _ => None,
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.store.len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char(' ') => self
                .selected_todo()
                .filter(|t| self.session.can_toggle(t))
                .map(|t| Action::Toggle(t.id.clone())),
            KeyCode::Char('a') => {
                self.input.clear();
                self.mode = BoardMode::Compose;
                None
            }
            KeyCode::Char('e') => {
                let todo = self.selected_todo().filter(|t| self.session.can_edit(t))?;
                let (id, text) = (todo.id.clone(), todo.text.clone());
                self.input = text;
                self.mode = BoardMode::Edit { id };
                None
            }
            KeyCode::Char('d') => self
                .selected_todo()
                .filter(|t| self.session.can_delete(t))
                .map(|t| Action::Delete(t.id.clone())),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('L') => Some(Action::Logout),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.leave_input_mode();
                None
            }
            KeyCode::Enter => {
                let text = self.input.trim();
                if text.is_empty() {
                    return None;
                }
                match &self.mode {
                    BoardMode::Compose => Some(Action::Add(text.to_string())),
                    BoardMode::Edit { id } => Some(Action::SaveEdit {
                        id: id.clone(),
                        text: text.to_string(),
                    }),
                    BoardMode::Browse => None,
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                None
            }
            _ => None,
        }
    }

    /// Applies an action.
    ///
    /// Local-only actions (login, logout, quit) take effect immediately.
    /// Actions that need the backend return the request to send; nothing in
    /// the local list changes until its [`Completion`] is passed to
    /// [`complete`](Self::complete).
    pub fn dispatch(&mut self, action: Action) -> Option<PendingRequest> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::Login(name) => {
                if !self.session.login(&name) {
                    return None;
                }
                self.name_input.clear();
                self.screen = Screen::Board;
                self.mode = BoardMode::Browse;
                self.selected = 0;
                Some(self.begin(StoreRequest::List))
            }
            Action::Logout => {
                self.logout();
                None
            }
            action => self.dispatch_board(action),
        }
    }

    fn dispatch_board(&mut self, action: Action) -> Option<PendingRequest> {
        if !self.session.is_logged_in() || self.loading {
            debug!(?action, "Board action refused");
            return None;
        }

        let request = match action {
            Action::Refresh => Ok(StoreRequest::List),
            Action::Add(text) => TodoStore::create_request(&text, self.session.display_name()),
            Action::Toggle(id) => self.store.toggle_request(&id),
            Action::SaveEdit { id, text } => {
                if text.trim().is_empty() {
                    return None;
                }
                Ok(StoreRequest::Update {
                    id,
                    patch: TodoPatch::text(text),
                })
            }
            Action::Delete(id) => Ok(StoreRequest::Delete { id }),
            Action::Login(_) | Action::Logout | Action::Quit => return None,
        };

        match request {
            Ok(request) => Some(self.begin(request)),
            Err(e) => {
                self.notice = Some(e.to_string());
                None
            }
        }
    }

    fn begin(&mut self, request: StoreRequest) -> PendingRequest {
        debug!(operation = %request.operation(), generation = self.generation, "Request started");
        self.loading = true;
        self.notice = None;
        PendingRequest {
            generation: self.generation,
            request,
        }
    }

    /// Folds a request's answer into the state.
    ///
    /// Answers issued before the last logout are dropped. On failure the
    /// local list is untouched and the notice names the failed action.
    pub fn complete(&mut self, completion: Completion) {
        if completion.generation != self.generation {
            debug!(
                operation = %completion.operation,
                generation = completion.generation,
                current = self.generation,
                "Discarding result from a previous session"
            );
            return;
        }
        self.loading = false;

        match completion.result {
            Ok(response) => {
                let appended = matches!(response, StoreResponse::Created(_));
                let edited = match (&response, &self.mode) {
                    (StoreResponse::Updated(todo), BoardMode::Edit { id }) => &todo.id == id,
                    _ => false,
                };

                self.store.apply(response);

                if appended {
                    self.leave_input_mode();
                    self.selected = self.store.len().saturating_sub(1);
                } else if edited {
                    self.leave_input_mode();
                }
                self.clamp_selection();
            }
            Err(e) => {
                warn!(operation = %completion.operation, error = %e, "Request failed");
                self.notice = Some(format!("Could not {}: {}", completion.operation.action(), e));
            }
        }
    }

    /// Runs an action to completion on the current task.
    pub async fn perform(&mut self, action: Action) {
        if let Some(pending) = self.dispatch(action) {
            let completion = pending.execute(self.store.backend()).await;
            self.complete(completion);
        }
    }

    fn logout(&mut self) {
        self.session.logout();
        self.store.clear_local();
        self.generation += 1;
        self.loading = false;
        self.notice = None;
        self.screen = Screen::Login;
        self.mode = BoardMode::Browse;
        self.input.clear();
        self.selected = 0;
    }

    fn leave_input_mode(&mut self) {
        self.mode = BoardMode::Browse;
        self.input.clear();
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.store.len().saturating_sub(1));
    }
}

/// Events that drive the run loop.
#[derive(Debug)]
pub enum TuiEvent {
    /// Periodic tick for the spinner.
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
    /// A store request finished.
    Completed(Completion),
}

/// Default tick rate for the event handler.
pub const DEFAULT_TICK_RATE_MS: u64 = 100;

const DEFAULT_POLL_TIMEOUT_MS: u64 = 10;

/// Polls the terminal and emits ticks until shut down.
///
/// Terminal polling runs on the blocking pool so the runtime is never stalled
/// by crossterm.
#[derive(Debug)]
pub struct EventHandler {
    event_tx: mpsc::Sender<TuiEvent>,
    shutdown_rx: oneshot::Receiver<()>,
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(event_tx: mpsc::Sender<TuiEvent>, shutdown_rx: oneshot::Receiver<()>) -> Self {
        Self::with_tick_rate(
            event_tx,
            shutdown_rx,
            Duration::from_millis(DEFAULT_TICK_RATE_MS),
        )
    }

    pub fn with_tick_rate(
        event_tx: mpsc::Sender<TuiEvent>,
        shutdown_rx: oneshot::Receiver<()>,
        tick_rate: Duration,
    ) -> Self {
        Self {
            event_tx,
            shutdown_rx,
            tick_rate,
        }
    }

    #[must_use]
    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Runs until the shutdown signal fires or the receiver is dropped.
    ///
    /// # Errors
    ///
    /// Returns `TuiError::Event` if the polling task panics.
    pub async fn run(mut self) -> Result<(), TuiError> {
        let mut tick_interval = tokio::time::interval(self.tick_rate);
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Burst);
        tick_interval.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = &mut self.shutdown_rx => {
                    debug!("EventHandler received shutdown signal");
                    break;
                }

                _ = tick_interval.tick() => {
                    if self.event_tx.send(TuiEvent::Tick).await.is_err() {
                        debug!("Event receiver dropped, exiting event loop");
                        break;
                    }
                }

                result = async {
                    tokio::time::sleep(Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS)).await;
                    tokio::task::spawn_blocking(|| {
                        Self::poll_terminal_event(Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS))
                    }).await
                } => {
                    match result {
                        Ok(Some(event)) => {
                            if self.event_tx.send(event).await.is_err() {
                                debug!("Event receiver dropped, exiting event loop");
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(join_error) => {
                            tracing::error!(error = %join_error, "Terminal polling task panicked");
                            return Err(TuiError::Event(join_error.to_string()));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Polls for one terminal event. Outside a terminal (tests, CI) polling
    /// fails and is treated as no event.
    fn poll_terminal_event(timeout: Duration) -> Option<TuiEvent> {
        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(e) => Self::convert_crossterm_event(e),
                Err(e) => {
                    tracing::trace!(error = %e, "Failed to read terminal event");
                    None
                }
            },
            Ok(false) => None,
            Err(e) => {
                tracing::trace!(error = %e, "Failed to poll terminal");
                None
            }
        }
    }

    fn convert_crossterm_event(event: CrosstermEvent) -> Option<TuiEvent> {
        match event {
            CrosstermEvent::Key(key) => Some(TuiEvent::Key(key)),
            CrosstermEvent::Resize(cols, rows) => Some(TuiEvent::Resize(cols, rows)),
            CrosstermEvent::Mouse(_)
            | CrosstermEvent::FocusGained
            | CrosstermEvent::FocusLost
            | CrosstermEvent::Paste(_) => None,
        }
    }
}
