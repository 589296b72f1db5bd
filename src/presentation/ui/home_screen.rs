//! Landing screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap},
};

use super::layout::centered;
use crate::domain::entities::Principal;
use crate::presentation::events;
use crate::presentation::theme::Theme;

/// Entries of the landing menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum HomeItem {
    Chat,
    SignIn,
    Register,
    Kiosk,
    Dashboard,
    SignOut,
    Quit,
}

impl HomeItem {
    const GUEST: [Self; 5] = [Self::Chat, Self::SignIn, Self::Register, Self::Kiosk, Self::Quit];
    const SIGNED_IN: [Self; 5] = [Self::Dashboard, Self::Chat, Self::Kiosk, Self::SignOut, Self::Quit];

    /// Menu entries for a guest or a signed-in user, in display order.
    #[must_use]
    pub const fn available(signed_in: bool) -> &'static [Self] {
        if signed_in { &Self::SIGNED_IN } else { &Self::GUEST }
    }

    /// Menu text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Chat => "Chat with the assistant",
            Self::SignIn => "Sign in",
            Self::Register => "Create an account",
            Self::Kiosk => "Walk-in kiosk",
            Self::Dashboard => "My dashboard",
            Self::SignOut => "Sign out",
            Self::Quit => "Quit",
        }
    }

    /// Single-letter shortcut.
    #[must_use]
    pub const fn shortcut(self) -> char {
        match self {
            Self::Chat => 'c',
            Self::SignIn => 'l',
            Self::Register => 'r',
            Self::Kiosk => 'k',
            Self::Dashboard => 'd',
            Self::SignOut => 'o',
            Self::Quit => 'q',
        }
    }
}

/// Landing menu state.
#[derive(Debug, Default)]
pub struct HomeScreen {
    selected: usize,
}

impl HomeScreen {
    /// Menu with the first entry highlighted.
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: 0 }
    }

    /// Highlights the first entry again.
    pub fn reset(&mut self) {
        self.selected = 0;
    }

    /// Returns the chosen item, if the key picked one.
    pub fn handle_key(&mut self, key: KeyEvent, signed_in: bool) -> Option<HomeItem> {
        let items = HomeItem::available(signed_in);
        self.selected = self.selected.min(items.len() - 1);

        if let Some(movement) = events::focus_move(&key) {
            self.selected = events::step_focus(self.selected, items.len(), movement);
            return None;
        }
        match key.code {
            KeyCode::Enter => items.get(self.selected).copied(),
            KeyCode::Char(c) => items.iter().copied().find(|item| item.shortcut() == c),
            _ => None,
        }
    }

    /// Draws the menu, greeting `principal` when signed in.
    pub fn render(
        &self,
        area: Rect,
        buf: &mut Buffer,
        theme: &Theme,
        principal: Option<&Principal>,
    ) {
        let content = centered(area, 56, 18);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(Span::styled(" VitalAI ", theme.title_style));
        let inner = block.inner(content);
        block.render(content, buf);

        let [intro, _, menu] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(inner);

        let identity = match principal {
            Some(p) => Line::from(vec![
                Span::raw("Signed in as "),
                Span::styled(p.display_name(), theme.user_style),
                Span::styled(format!(" ({})", p.role().label()), theme.dimmed_style),
            ]),
            None => Line::from(Span::styled("You are browsing as a guest.", theme.dimmed_style)),
        };
        Paragraph::new(vec![
            Line::from(Span::styled(
                "Your medical assistant for symptoms, appointments and advice.",
                Style::default().add_modifier(Modifier::ITALIC),
            )),
            Line::default(),
            identity,
        ])
        .wrap(Wrap { trim: true })
        .render(intro, buf);

        let items: Vec<ListItem> = HomeItem::available(principal.is_some())
            .iter()
            .map(|item| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("[{}] ", item.shortcut()), theme.dimmed_style),
                    Span::raw(item.label()),
                ]))
            })
            .collect();
        let mut state = ListState::default().with_selected(Some(self.selected));
        StatefulWidget::render(
            List::new(items)
                .highlight_style(theme.selection_style)
                .highlight_symbol("> "),
            menu,
            buf,
            &mut state,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_guest_menu() {
        let mut home = HomeScreen::new();
        assert_eq!(home.handle_key(key(KeyCode::Enter), false), Some(HomeItem::Chat));
        home.handle_key(key(KeyCode::Down), false);
        assert_eq!(home.handle_key(key(KeyCode::Enter), false), Some(HomeItem::SignIn));
        assert_eq!(home.handle_key(key(KeyCode::Char('d')), false), None);
    }

    #[test]
    fn test_signed_in_shortcuts() {
        let mut home = HomeScreen::new();
        assert_eq!(home.handle_key(key(KeyCode::Char('d')), true), Some(HomeItem::Dashboard));
        assert_eq!(home.handle_key(key(KeyCode::Char('o')), true), Some(HomeItem::SignOut));
        assert_eq!(home.handle_key(key(KeyCode::Char('l')), true), None);
    }
}
