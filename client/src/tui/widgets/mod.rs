//! Widgets for the taskboard TUI.
//!
//! Widgets are stateless: each borrows the pieces of [`AppState`] it draws
//! plus the [`Theme`] and [`Symbols`], and implements ratatui's [`Widget`].
//!
//! - [`login_form`]: display name entry
//! - [`header`]: title, current user and list summary
//! - [`todo_list`]: the items with checkbox, author and "view only" marker
//! - [`text_input`]: bordered single-line prompt for compose and edit
//! - [`status_bar`]: spinner, error notice or key hints
//!
//! [`AppState`]: crate::tui::app::AppState
//! [`Theme`]: crate::tui::app::Theme
//! [`Symbols`]: crate::tui::app::Symbols
//! [`Widget`]: ratatui::widgets::Widget

pub mod header;
pub mod login_form;
pub mod status_bar;
pub mod text_input;
pub mod todo_list;

pub use header::{HeaderWidget, HEADER_HEIGHT};
pub use login_form::LoginFormWidget;
pub use status_bar::{StatusBarWidget, STATUS_BAR_HEIGHT};
pub use text_input::{TextInputWidget, TEXT_INPUT_HEIGHT};
pub use todo_list::TodoListWidget;
