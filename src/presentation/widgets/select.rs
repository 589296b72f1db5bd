//! Option selector widget.

use std::fmt::Display;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Cycles through a fixed set of options with Left/Right.
///
/// Starts unselected unless [`Select::with_selected`] is used; cycling from
/// the unselected state lands on the first or last option.
#[derive(Debug, Clone)]
pub struct Select<T> {
    label: String,
    options: Vec<T>,
    index: Option<usize>,
    focused: bool,
    error: Option<String>,
}

impl<T: Copy + PartialEq + Display> Select<T> {
    /// Unselected picker over `options`.
    #[must_use]
    pub fn new(label: impl Into<String>, options: impl Into<Vec<T>>) -> Self {
        Self {
            label: label.into(),
            options: options.into(),
            index: None,
            focused: false,
            error: None,
        }
    }

    /// Starts on `value`.
    #[must_use]
    pub fn with_selected(mut self, value: T) -> Self {
        self.select(value);
        self
    }

    /// Chosen option, `None` until one is picked.
    #[must_use]
    pub fn selected(&self) -> Option<T> {
        self.index.and_then(|i| self.options.get(i).copied())
    }

    /// Selects `value` if it is one of the options.
    pub fn select(&mut self, value: T) {
        if let Some(i) = self.options.iter().position(|o| *o == value) {
            self.index = Some(i);
        }
    }

    /// Drops the selection.
    pub fn clear(&mut self) {
        self.index = None;
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &[T] {
        &self.options
    }

    /// Replaces the options, keeping the selection when it survives.
    pub fn set_options(&mut self, options: Vec<T>) {
        let current = self.selected();
        self.options = options;
        self.index = current.and_then(|c| self.options.iter().position(|o| *o == c));
    }

    /// Selects the following option, wrapping.
    pub fn next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.index = Some(self.index.map_or(0, |i| (i + 1) % self.options.len()));
        self.error = None;
    }

    /// Selects the previous option, wrapping.
    pub fn prev(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let last = self.options.len() - 1;
        self.index = Some(self.index.map_or(last, |i| i.checked_sub(1).unwrap_or(last)));
        self.error = None;
    }

    /// Returns whether the selection changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let before = self.index;
        match key.code {
            KeyCode::Right | KeyCode::Char(' ') => self.next(),
            KeyCode::Left => self.prev(),
            _ => return false,
        }
        before != self.index
    }

    /// Focused pickers draw the accent border.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Field error shown in the title until the selection changes.
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

impl<T: Copy + PartialEq + Display> Widget for &Select<T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = match (&self.error, self.focused) {
            (Some(_), _) => Style::default().fg(Color::Red),
            (None, true) => Style::default().fg(Color::Cyan),
            (None, false) => Style::default().fg(Color::Gray),
        };

        let mut title = vec![Span::raw(self.label.as_str())];
        if let Some(error) = &self.error {
            title.push(Span::styled(format!(" - {error}"), Style::default().fg(Color::Red)));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Line::from(title));

        let value = match self.selected() {
            Some(value) => Span::styled(value.to_string(), Style::default().fg(Color::White)),
            None => Span::styled("Select...", Style::default().fg(Color::DarkGray)),
        };
        let arrows = Style::default().fg(if self.focused {
            Color::Cyan
        } else {
            Color::DarkGray
        });
        let line = Line::from(vec![
            Span::styled("< ", arrows),
            value,
            Span::styled(" >", arrows),
        ]);

        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new(line).render(inner, buf);
    }
}
