//! The todo list panel.
//!
//! One row per item in store order:
//!
//! ```text
//! ┌ Todos ───────────────────────────────────────────┐
//! │▶ [ ] Buy milk  by Alice                          │
//! │  [✓] Walk dog  by Bob  (view only)               │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Rows the current session cannot edit carry a "view only" marker. The list
//! scrolls so the selected row is always visible.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::session::SessionManager;
use crate::tui::app::{Symbols, Theme};
use crate::types::Todo;

const EMPTY_HINT: &str = "No todos yet. Press a to add one.";

#[derive(Debug)]
pub struct TodoListWidget<'a> {
    items: &'a [Todo],
    selected: usize,
    session: &'a SessionManager,
    focused: bool,
    theme: &'a Theme,
    symbols: &'a Symbols,
}

impl<'a> TodoListWidget<'a> {
    #[must_use]
    pub fn new(
        items: &'a [Todo],
        selected: usize,
        session: &'a SessionManager,
        theme: &'a Theme,
        symbols: &'a Symbols,
    ) -> Self {
        Self {
            items,
            selected,
            session,
            focused: true,
            theme,
            symbols,
        }
    }

    /// Dims the border while the input prompt has focus.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// First row to draw so that `selected` fits in `height` rows.
    fn scroll_offset(&self, height: usize) -> usize {
        if height == 0 {
            return 0;
        }
        self.selected.saturating_sub(height - 1)
    }

    fn row(&self, index: usize, todo: &'a Todo) -> Line<'a> {
        let is_selected = index == self.selected;
        let pointer = if is_selected { self.symbols.pointer } else { " " };
        let checkbox = if todo.completed {
            self.symbols.checked
        } else {
            self.symbols.unchecked
        };
        let text_style = if todo.completed {
            self.theme.todo_done
        } else {
            self.theme.todo_open
        };

        let mut spans = vec![
            Span::raw(pointer),
            Span::raw(" "),
            Span::styled(checkbox, text_style),
            Span::raw(" "),
            Span::styled(todo.text.as_str(), text_style),
            Span::raw("  "),
            Span::styled(format!("by {}", todo.author), self.theme.author),
        ];
        if !self.session.can_edit(todo) {
            spans.push(Span::styled("  (view only)", self.theme.view_only));
        }

        let line = Line::from(spans);
        if is_selected {
            line.style(self.theme.selected)
        } else {
            line
        }
    }
}

impl Widget for TodoListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border
        };
        let block = Block::default()
            .title(" Todos ")
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.items.is_empty() {
            Paragraph::new(EMPTY_HINT)
                .style(self.theme.text_muted)
                .alignment(Alignment::Center)
                .render(inner, buf);
            return;
        }

        let height = usize::from(inner.height);
        let offset = self.scroll_offset(height);
        let lines: Vec<Line> = self
            .items
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(i, todo)| self.row(i, todo))
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySlot;
    use crate::tui::app::{ASCII_SYMBOLS, UNICODE_SYMBOLS};
    use crate::types::NewTodo;

    fn items() -> Vec<Todo> {
        let mut walk = NewTodo::new("Walk dog", "Bob").into_todo("2".to_string());
        walk.completed = true;
        vec![
            NewTodo::new("Buy milk", "Alice").into_todo("1".to_string()),
            walk,
        ]
    }

    fn session(name: &str) -> SessionManager {
        let mut session = SessionManager::new(Box::new(MemorySlot::new()));
        session.login(name);
        session
    }

    fn rows(items: &[Todo], selected: usize, session: &SessionManager, area: Rect) -> Vec<String> {
        let theme = Theme::default();
        let mut buf = Buffer::empty(area);
        TodoListWidget::new(items, selected, session, &theme, &ASCII_SYMBOLS).render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn renders_checkbox_text_and_author() {
        let items = items();
        let rows = rows(&items, 0, &session("Alice"), Rect::new(0, 0, 60, 6));

        assert!(rows[1].contains("> [ ] Buy milk  by Alice"));
        assert!(rows[2].contains("[x] Walk dog  by Bob"));
    }

    #[test]
    fn marks_rows_the_session_cannot_edit() {
        let items = items();
        let rows = rows(&items, 0, &session("Alice"), Rect::new(0, 0, 60, 6));

        assert!(!rows[1].contains("view only"));
        assert!(rows[2].contains("(view only)"));
    }

    #[test]
    fn empty_list_shows_hint() {
        let rows = rows(&[], 0, &session("Alice"), Rect::new(0, 0, 60, 5));
        assert!(rows.iter().any(|r| r.contains("No todos yet")));
    }

    #[test]
    fn scrolls_to_keep_selection_visible() {
        let items: Vec<Todo> = (0..10)
            .map(|i| NewTodo::new(format!("item {i}"), "Alice").into_todo(i.to_string()))
            .collect();
        // Three visible rows inside the border.
        let rows = rows(&items, 7, &session("Alice"), Rect::new(0, 0, 40, 5));

        assert!(rows[1].contains("item 5"));
        assert!(rows[3].contains("> [ ] item 7"));
    }

    #[test]
    fn renders_with_unicode_symbols() {
        let theme = Theme::monochrome();
        let items = items();
        let session = session("Bob");
        let area = Rect::new(0, 0, 50, 4);
        let mut buf = Buffer::empty(area);
        TodoListWidget::new(&items, 1, &session, &theme, &UNICODE_SYMBOLS)
            .focused(false)
            .render(area, &mut buf);
    }
}
