//! Status bar widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::domain::errors::ClientError;

/// Status bar severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusLevel {
    /// Returns color for level.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Bottom line: a message on the left, context on the right.
#[derive(Debug, Clone)]
pub struct StatusBar {
    left: String,
    right: String,
    level: StatusLevel,
}

impl StatusBar {
    /// Empty info bar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            left: String::new(),
            right: String::new(),
            level: StatusLevel::Info,
        }
    }

    /// Sets the message.
    #[must_use]
    pub fn left(mut self, content: impl Into<String>) -> Self {
        self.left = content.into();
        self
    }

    /// Sets the right-aligned context.
    #[must_use]
    pub fn right(mut self, content: impl Into<String>) -> Self {
        self.right = content.into();
        self
    }

    /// Sets the severity.
    #[must_use]
    pub const fn level(mut self, level: StatusLevel) -> Self {
        self.level = level;
        self
    }

    /// Info bar with `message`.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new().left(message).level(StatusLevel::Info)
    }

    /// Success bar with `message`.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new().left(message).level(StatusLevel::Success)
    }

    /// Warning bar with `message`.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new().left(message).level(StatusLevel::Warning)
    }

    /// Error bar with `message`.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new().left(message).level(StatusLevel::Error)
    }

    /// Error bar carrying the user-facing message of `error`.
    #[must_use]
    pub fn from_error(error: &ClientError) -> Self {
        Self::error(error.user_message())
    }

    /// Message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.left
    }

    /// Message severity.
    #[must_use]
    pub const fn severity(&self) -> StatusLevel {
        self.level
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .fg(self.level.color())
            .add_modifier(Modifier::BOLD);

        let width = usize::from(area.width);
        let left_len = self.left.width();
        let right_len = self.right.width();

        let mut spans = vec![Span::styled(self.left.as_str(), style)];
        if !self.right.is_empty() && left_len + right_len < width {
            spans.push(Span::raw(" ".repeat(width - left_len - right_len)));
            spans.push(Span::styled(
                self.right.as_str(),
                Style::default().fg(Color::DarkGray),
            ));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
