//! Key classification shared by every screen.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Form focus movement requested by a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    /// Following field.
    Next,
    /// Previous field.
    Prev,
}

/// Returns whether the key should be handled at all (presses and repeats).
#[must_use]
pub fn is_actionable(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
}

/// Ctrl+C or Ctrl+Q quit from anywhere.
#[must_use]
pub fn is_quit_event(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c' | 'q'))
}

/// Esc leaves the current form or screen.
#[must_use]
pub fn is_back_event(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
}

/// Enter submits or advances.
#[must_use]
pub fn is_submit_event(key: &KeyEvent) -> bool {
    key.code == KeyCode::Enter
}

/// Tab/Down move forward, Shift+Tab/Up move back.
#[must_use]
pub fn focus_move(key: &KeyEvent) -> Option<FocusMove> {
    match key.code {
        KeyCode::Tab | KeyCode::Down => Some(FocusMove::Next),
        KeyCode::BackTab | KeyCode::Up => Some(FocusMove::Prev),
        _ => None,
    }
}

/// Ctrl+<c>.
#[must_use]
pub fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// Advances a focus index over `len` fields, wrapping.
#[must_use]
pub const fn step_focus(current: usize, len: usize, movement: FocusMove) -> usize {
    if len == 0 {
        return 0;
    }
    match movement {
        FocusMove::Next => (current + 1) % len,
        FocusMove::Prev => (current + len - 1) % len,
    }
}
