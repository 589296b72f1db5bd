//! Color theme.

use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use tracing::warn;

/// Styles shared by every screen.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
pub struct Theme {
    pub accent: Color,
    pub title_style: Style,
    pub selection_style: Style,
    pub dimmed_style: Style,
    pub error_style: Style,
    pub success_style: Style,
    pub user_style: Style,
    pub assistant_style: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_color(Color::Cyan)
    }
}

impl Theme {
    /// Builds a theme from a color name such as `cyan` or `#00afaf`.
    #[must_use]
    pub fn new(accent: &str) -> Self {
        Self::from_color(parse_color(accent))
    }

    /// Derives every style from one accent color.
    #[must_use]
    pub fn from_color(accent: Color) -> Self {
        Self {
            accent,
            title_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            selection_style: Style::default()
                .fg(Color::Black)
                .bg(accent)
                .add_modifier(Modifier::BOLD),
            dimmed_style: Style::default().fg(Color::DarkGray),
            error_style: Style::default().fg(Color::Red),
            success_style: Style::default().fg(Color::Green),
            user_style: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            assistant_style: Style::default().fg(accent),
        }
    }

    /// Accent border when focused, gray otherwise.
    #[must_use]
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(Color::Gray)
        }
    }
}

fn parse_color(s: &str) -> Color {
    Color::from_str(s.trim()).unwrap_or_else(|_| {
        warn!(color = s, "Unknown accent color, using cyan");
        Color::Cyan
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_and_hex() {
        assert_eq!(Theme::new("yellow").accent, Color::Yellow);
        assert_eq!(Theme::new("#00afaf").accent, Color::Rgb(0, 0xaf, 0xaf));
        assert_eq!(Theme::new("not-a-color").accent, Color::Cyan);
    }
}
