use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Footer listing the keys available on the current screen.
pub struct KeyHints<'a> {
    hints: &'a [(&'a str, &'a str)],
    key_style: Style,
    label_style: Style,
}

impl<'a> KeyHints<'a> {
    /// Footer for `(key, label)` pairs.
    #[must_use]
    pub fn new(hints: &'a [(&'a str, &'a str)]) -> Self {
        Self {
            hints,
            key_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            label_style: Style::default().fg(Color::DarkGray),
        }
    }

    /// Key badge background.
    #[must_use]
    pub const fn accent(mut self, color: Color) -> Self {
        self.key_style = self.key_style.bg(color);
        self
    }
}

impl Widget for KeyHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::with_capacity(self.hints.len() * 3);
        for (i, (key, label)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(format!(" {key} "), self.key_style));
            spans.push(Span::styled(format!(" {label}"), self.label_style));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
