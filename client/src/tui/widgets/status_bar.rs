//! Status bar at the bottom of the board screen.
//!
//! Shows, in order of precedence: a spinner while a request is in flight,
//! the last error notice, or the key hints for the current board mode.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::app::{BoardMode, Symbols, Theme};

/// Height of the status bar in rows.
pub const STATUS_BAR_HEIGHT: u16 = 1;

const BROWSE_HINTS: &[(&str, &str)] = &[
    ("j/k", "select"),
    ("space", "toggle"),
    ("a", "add"),
    ("e", "edit"),
    ("d", "delete"),
    ("r", "refresh"),
    ("L", "log out"),
    ("q", "quit"),
];

const INPUT_HINTS: &[(&str, &str)] = &[("Enter", "save"), ("Esc", "cancel")];

#[derive(Debug)]
pub struct StatusBarWidget<'a> {
    mode: &'a BoardMode,
    loading: bool,
    notice: Option<&'a str>,
    ticks: usize,
    theme: &'a Theme,
    symbols: &'a Symbols,
}

impl<'a> StatusBarWidget<'a> {
    #[must_use]
    pub fn new(mode: &'a BoardMode, theme: &'a Theme, symbols: &'a Symbols) -> Self {
        Self {
            mode,
            loading: false,
            notice: None,
            ticks: 0,
            theme,
            symbols,
        }
    }

    /// Shows the spinner at the given animation tick.
    #[must_use]
    pub fn loading(mut self, loading: bool, ticks: usize) -> Self {
        self.loading = loading;
        self.ticks = ticks;
        self
    }

    #[must_use]
    pub fn notice(mut self, notice: Option<&'a str>) -> Self {
        self.notice = notice;
        self
    }

    fn line(&self) -> Line<'a> {
        if self.loading {
            return Line::from(vec![
                Span::styled(self.symbols.spinner_frame(self.ticks), self.theme.loading),
                Span::styled(" Working...", self.theme.loading),
            ]);
        }
        if let Some(notice) = self.notice {
            return Line::from(vec![
                Span::styled(self.symbols.failure, self.theme.notice_error),
                Span::raw(" "),
                Span::styled(notice, self.theme.notice_error),
            ]);
        }

        let hints = match self.mode {
            BoardMode::Browse => BROWSE_HINTS,
            BoardMode::Compose | BoardMode::Edit { .. } => INPUT_HINTS,
        };
        let mut spans = Vec::with_capacity(hints.len() * 2);
        for (key, label) in hints {
            spans.push(Span::styled(*key, self.theme.key_hint));
            spans.push(Span::styled(format!(" {label}  "), self.theme.text_secondary));
        }
        Line::from(spans)
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.line()).render(area, buf);
    }
}
