//! Single-line bordered text input.
//!
//! Used by the login form for the display name and by the board for the
//! compose and edit prompts. A trailing `_` marks the cursor when focused.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::tui::app::Theme;

/// Height of the input including its border.
pub const TEXT_INPUT_HEIGHT: u16 = 3;

#[derive(Debug)]
pub struct TextInputWidget<'a> {
    value: &'a str,
    title: &'a str,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> TextInputWidget<'a> {
    #[must_use]
    pub fn new(value: &'a str, title: &'a str, theme: &'a Theme) -> Self {
        Self {
            value,
            title,
            focused: true,
            theme,
        }
    }

    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// The visible tail of the value. Long values scroll left so the cursor
    /// stays in view.
    fn visible_text(&self, width: u16) -> String {
        let mut text = self.value.to_string();
        if self.focused {
            text.push('_');
        }
        let width = usize::from(width);
        let len = text.chars().count();
        if len <= width {
            text
        } else {
            text.chars().skip(len - width).collect()
        }
    }
}

impl Widget for TextInputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (border_style, text_style): (Style, Style) = if self.focused {
            (self.theme.border_focused, self.theme.input_focused)
        } else {
            (self.theme.border, self.theme.input_unfocused)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", self.title));
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.visible_text(inner.width))
            .style(text_style)
            .render(inner, buf);
    }
}
