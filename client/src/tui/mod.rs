//! Terminal user interface for the taskboard client.
//!
//! Built with [`ratatui`] on top of crossterm.
//!
//! - [`app`]: application state, key handling, request dispatch, event loop
//! - [`ui`]: frame layout and per-screen rendering
//! - [`terminal`]: raw mode and alternate screen with panic-safe restore
//! - [`widgets`]: the individual panels

pub mod app;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use app::{Action, AppState, Completion, EventHandler, PendingRequest, TuiEvent};
pub use terminal::{install_panic_hook, Tui};
