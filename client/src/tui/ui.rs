//! Frame rendering for the taskboard TUI.
//!
//! ```text
//! render() --> match state.screen {
//!     Login --> render_login_screen()
//!     Board --> render_board_screen()
//! }
//! ```
//!
//! The board is laid out top to bottom as header, list, an input prompt while
//! composing or editing, and the status bar.

use ratatui::{
    layout::{Constraint, Layout},
    Frame,
};

use crate::tui::app::{AppState, BoardMode, Screen};
use crate::tui::widgets::{
    HeaderWidget, LoginFormWidget, StatusBarWidget, TextInputWidget, TodoListWidget,
    HEADER_HEIGHT, STATUS_BAR_HEIGHT, TEXT_INPUT_HEIGHT,
};

/// Renders the screen selected by `state.screen`.
pub fn render(frame: &mut Frame, state: &AppState) {
    match state.screen {
        Screen::Login => render_login_screen(frame, state),
        Screen::Board => render_board_screen(frame, state),
    }
}

fn render_login_screen(frame: &mut Frame, state: &AppState) {
    let widget = LoginFormWidget::new(&state.name_input, &state.theme);
    frame.render_widget(widget, frame.area());
}

fn render_board_screen(frame: &mut Frame, state: &AppState) {
    let prompt_title = match &state.mode {
        BoardMode::Browse => None,
        BoardMode::Compose => Some("New todo"),
        BoardMode::Edit { .. } => Some("Edit todo"),
    };
    let prompt_height = if prompt_title.is_some() {
        TEXT_INPUT_HEIGHT
    } else {
        0
    };

    let [header_area, list_area, prompt_area, status_area] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(prompt_height),
        Constraint::Length(STATUS_BAR_HEIGHT),
    ])
    .areas(frame.area());

    frame.render_widget(
        HeaderWidget::new(
            state.session.display_name(),
            state.store.items(),
            &state.theme,
            &state.symbols,
        ),
        header_area,
    );

    frame.render_widget(
        TodoListWidget::new(
            state.store.items(),
            state.selected,
            &state.session,
            &state.theme,
            &state.symbols,
        )
        .focused(prompt_title.is_none()),
        list_area,
    );

    if let Some(title) = prompt_title {
        frame.render_widget(
            TextInputWidget::new(&state.input, title, &state.theme),
            prompt_area,
        );
    }

    frame.render_widget(
        StatusBarWidget::new(&state.mode, &state.theme, &state.symbols)
            .loading(state.loading, state.ticks)
            .notice(state.notice.as_deref()),
        status_area,
    );
}
