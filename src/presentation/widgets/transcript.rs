//! Chat transcript view.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::entities::{ChatMessage, MessageKind, Sender, Transcript};
use crate::presentation::theme::Theme;

/// Renders a transcript bottom-anchored, scrolled up by `scroll` lines.
pub struct TranscriptView<'a> {
    transcript: &'a Transcript,
    theme: &'a Theme,
    timestamp_format: &'a str,
    pending: bool,
    scroll: usize,
}

impl<'a> TranscriptView<'a> {
    /// View over `transcript`, timestamps in `timestamp_format`.
    #[must_use]
    pub const fn new(transcript: &'a Transcript, theme: &'a Theme, timestamp_format: &'a str) -> Self {
        Self {
            transcript,
            theme,
            timestamp_format,
            pending: false,
            scroll: 0,
        }
    }

    /// Shows the typing line while a reply is pending.
    #[must_use]
    pub const fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    /// Lines scrolled up from the newest message.
    #[must_use]
    pub const fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    fn message_lines(&self, message: &ChatMessage, width: usize) -> Vec<Line<'static>> {
        let (name, style) = match message.sender() {
            Sender::User => ("You", self.theme.user_style),
            Sender::Assistant => ("VitalAI", self.theme.assistant_style),
        };
        let marker = match message.kind() {
            MessageKind::Text => "",
            MessageKind::File => " [document]",
            MessageKind::AppointmentNotice => " [appointment]",
        };

        let mut lines = vec![Line::from(vec![
            Span::styled(name, style),
            Span::styled(marker, style.add_modifier(Modifier::ITALIC)),
            Span::styled(
                format!("  {}", message.timestamp().format(self.timestamp_format)),
                self.theme.dimmed_style,
            ),
        ])];
        for text_line in message.text().lines() {
            lines.extend(
                wrap_text(text_line, width.saturating_sub(2))
                    .into_iter()
                    .map(|l| Line::from(format!("  {l}"))),
            );
        }
        lines.push(Line::default());
        lines
    }
}

impl Widget for TranscriptView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false))
            .title(" Conversation ");
        let inner = block.inner(area);
        block.render(area, buf);

        let width = usize::from(inner.width);
        let mut lines: Vec<Line<'static>> = self
            .transcript
            .messages()
            .iter()
            .flat_map(|m| self.message_lines(m, width))
            .collect();
        if self.pending {
            lines.push(Line::from(Span::styled(
                "VitalAI is typing...",
                self.theme.dimmed_style.add_modifier(Modifier::ITALIC),
            )));
        }

        let height = usize::from(inner.height);
        let max_scroll = lines.len().saturating_sub(height);
        let top = max_scroll.saturating_sub(self.scroll.min(max_scroll));
        let visible: Vec<Line<'static>> = lines.into_iter().skip(top).take(height).collect();

        Paragraph::new(visible)
            .style(Style::default())
            .render(inner, buf);
    }
}

/// Greedy word wrap by display width. Words wider than `width` are split.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        for c in word.chars() {
            if current.width() + c.width().unwrap_or(0) > width {
                lines.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
