//! Header bar for the board screen.
//!
//! Shows the app title on the left and the logged-in user with a summary of
//! the list on the right:
//!
//! ```text
//!  Taskboard                                  ● Alice  3 todos, 1 done
//! ```
//!
//! On narrow terminals the summary is dropped first, then the title.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::app::{Symbols, Theme};
use crate::types::Todo;

/// Height of the header in rows.
pub const HEADER_HEIGHT: u16 = 1;

const TITLE: &str = " Taskboard ";

#[derive(Debug)]
pub struct HeaderWidget<'a> {
    user: &'a str,
    items: &'a [Todo],
    theme: &'a Theme,
    symbols: &'a Symbols,
}

impl<'a> HeaderWidget<'a> {
    #[must_use]
    pub fn new(user: &'a str, items: &'a [Todo], theme: &'a Theme, symbols: &'a Symbols) -> Self {
        Self {
            user,
            items,
            theme,
            symbols,
        }
    }

    fn summary(&self) -> String {
        let done = self.items.iter().filter(|t| t.completed).count();
        let noun = if self.items.len() == 1 { "todo" } else { "todos" };
        format!("{} {}, {} done", self.items.len(), noun, done)
    }

    fn user_spans(&self) -> Vec<Span<'a>> {
        vec![
            Span::styled(self.symbols.user, self.theme.author),
            Span::raw(" "),
            Span::styled(self.user, self.theme.title),
        ]
    }
}

impl Widget for HeaderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let summary = self.summary();
        let mut right = self.user_spans();
        let user_width = Line::from(right.clone()).width();
        let title_width = TITLE.chars().count();
        let width = usize::from(area.width);

        let show_summary = user_width + summary.len() + title_width + 3 <= width;
        let show_title = user_width + title_width + 1 <= width;

        if show_summary {
            right.push(Span::raw("  "));
            right.push(Span::styled(summary, self.theme.text_secondary));
        }
        right.push(Span::raw(" "));

        let line = Line::from(right);
        let right_width = u16::try_from(line.width()).unwrap_or(u16::MAX).min(area.width);
        let [left_area, right_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(right_width)]).areas(area);

        if show_title {
            Paragraph::new(Span::styled(TITLE, self.theme.title)).render(left_area, buf);
        }
        Paragraph::new(line)
            .alignment(Alignment::Right)
            .render(right_area, buf);
    }
}
