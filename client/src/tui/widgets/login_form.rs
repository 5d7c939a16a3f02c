//! Login form widget.
//!
//! Shown while no session is active. The user types a display name; no
//! password is involved.
//!
//! ```text
//! ┌──────────────── Taskboard ────────────────┐
//! │                                           │
//! │  Who are you?                             │
//! │  ┌ Display name ────────────────────────┐ │
//! │  │ Alice_                               │ │
//! │  └──────────────────────────────────────┘ │
//! │                                           │
//! │        Enter log in   Esc quit            │
//! └───────────────────────────────────────────┘
//! ```

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::text_input::{TextInputWidget, TEXT_INPUT_HEIGHT};
use crate::tui::app::Theme;

const MIN_FORM_WIDTH: u16 = 30;
const MAX_FORM_WIDTH: u16 = 56;

/// Height of the form content (excluding outer border).
const FORM_CONTENT_HEIGHT: u16 = 8;

#[derive(Debug)]
pub struct LoginFormWidget<'a> {
    name: &'a str,
    theme: &'a Theme,
}

impl<'a> LoginFormWidget<'a> {
    #[must_use]
    pub fn new(name: &'a str, theme: &'a Theme) -> Self {
        Self { name, theme }
    }

    fn centered_rect(area: Rect) -> Rect {
        let width = area.width.clamp(MIN_FORM_WIDTH, MAX_FORM_WIDTH);
        let height = FORM_CONTENT_HEIGHT + 2;

        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;

        Rect::new(x, y, width.min(area.width), height.min(area.height))
    }

    fn hint_line(&self) -> Line<'static> {
        Line::from(vec![
            Span::styled("Enter", self.theme.key_hint),
            Span::styled(" log in   ", self.theme.text_secondary),
            Span::styled("Esc", self.theme.key_hint),
            Span::styled(" quit", self.theme.text_secondary),
        ])
    }
}

impl Widget for LoginFormWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let form_area = Self::centered_rect(area);

        let outer_block = Block::default()
            .title(" Taskboard ")
            .title_alignment(Alignment::Center)
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .style(self.theme.text_primary);
        let inner = outer_block.inner(form_area);
        outer_block.render(form_area, buf);

        if inner.width < 20 || inner.height < FORM_CONTENT_HEIGHT {
            Paragraph::new("Window too small")
                .style(self.theme.text_muted)
                .alignment(Alignment::Center)
                .render(inner, buf);
            return;
        }

        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(TEXT_INPUT_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        let padded = |rect: Rect| Rect::new(rect.x + 2, rect.y, rect.width.saturating_sub(4), rect.height);

        Paragraph::new("Who are you?")
            .style(self.theme.label)
            .render(padded(chunks[1]), buf);
        TextInputWidget::new(self.name, "Display name", self.theme).render(padded(chunks[2]), buf);
        Paragraph::new(self.hint_line())
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_string(name: &str, area: Rect) -> String {
        let theme = Theme::default();
        let mut buf = Buffer::empty(area);
        LoginFormWidget::new(name, &theme).render(area, &mut buf);
        buf.content
            .iter()
            .map(|cell| cell.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    #[test]
    fn renders_title_and_typed_name() {
        let content = render_to_string("Alice", Rect::new(0, 0, 80, 24));
        assert!(content.contains("Taskboard"));
        assert!(content.contains("Alice_"));
        assert!(content.contains("Display name"));
    }

    #[test]
    fn small_area_shows_warning() {
        let content = render_to_string("Alice", Rect::new(0, 0, 24, 6));
        assert!(!content.contains("Alice_"));
    }

    #[test]
    fn centered_rect_is_centered() {
        let rect = LoginFormWidget::centered_rect(Rect::new(0, 0, 100, 30));
        assert_eq!(rect.width, MAX_FORM_WIDTH);
        assert_eq!(rect.x, (100 - MAX_FORM_WIDTH) / 2);
        assert_eq!(rect.y, (30 - (FORM_CONTENT_HEIGHT + 2)) / 2);
    }
}
