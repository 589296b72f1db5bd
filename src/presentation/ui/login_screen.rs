//! Login screen.

use crossterm::event::KeyEvent;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use super::layout::centered;
use crate::application::dto::LoginRequest;
use crate::domain::entities::Role;
use crate::domain::errors::FormField;
use crate::domain::services::AccountValidator;
use crate::presentation::events::{self, FocusMove, step_focus};
use crate::presentation::widgets::{Select, TextInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum LoginState {
    Input,
    Validating,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Role,
    Identifier,
    Password,
}

const FIELDS: [Field; 3] = [Field::Role, Field::Identifier, Field::Password];

/// Result of a key press on the login screen.
#[derive(Debug)]
pub enum LoginAction {
    /// Nothing for the app to do.
    None,
    /// Credentials that passed local checks.
    Submit(LoginRequest),
    /// Switch to registration.
    Register,
    /// Continue to chat without signing in.
    GuestChat,
    /// Back to home.
    Back,
}

/// Sign-in form.
pub struct LoginScreen {
    role: Select<Role>,
    identifier: TextInput,
    password: TextInput,
    focus: usize,
    state: LoginState,
    error_message: Option<String>,
    persist: bool,
}

impl LoginScreen {
    /// Empty form with focus on the identifier.
    #[must_use]
    pub fn new(persist: bool) -> Self {
        let mut screen = Self {
            role: Select::new("I am a", [Role::Patient, Role::Staff]).with_selected(Role::Patient),
            identifier: TextInput::new("ID number").placeholder("Enter your ID or passport number"),
            password: TextInput::new("Password").password(),
            focus: 1,
            state: LoginState::Input,
            error_message: None,
            persist,
        };
        screen.sync_focus();
        screen
    }

    /// Form state: editing, waiting for the backend, or showing an error.
    #[must_use]
    pub const fn state(&self) -> LoginState {
        self.state
    }

    /// Whether the session should outlive this run.
    #[must_use]
    pub const fn should_persist(&self) -> bool {
        self.persist
    }

    /// Role picked in the selector.
    #[must_use]
    pub fn selected_role(&self) -> Role {
        self.role.selected().unwrap_or(Role::Patient)
    }

    /// Request in flight. Clears the previous error.
    pub fn set_validating(&mut self) {
        self.state = LoginState::Validating;
        self.error_message = None;
    }

    /// Shows a failed sign-in.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state = LoginState::Error;
        self.error_message = Some(message.into());
    }

    /// Last sign-in error, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Clears the form for the next visit, keeping the remember choice.
    pub fn reset(&mut self) {
        let persist = self.persist;
        *self = Self::new(persist);
    }

    fn focused(&self) -> Field {
        FIELDS[self.focus]
    }

    fn sync_focus(&mut self) {
        let focused = self.focused();
        self.role.set_focused(focused == Field::Role);
        self.identifier.set_focused(focused == Field::Identifier);
        self.password.set_focused(focused == Field::Password);
    }

    fn move_focus(&mut self, movement: FocusMove) {
        self.focus = step_focus(self.focus, FIELDS.len(), movement);
        self.sync_focus();
    }

    fn role_changed(&mut self) {
        let label = match self.selected_role() {
            Role::Staff => "Staff number",
            _ => "ID number",
        };
        self.identifier.set_label(label);
    }

    fn submit(&mut self) -> LoginAction {
        match AccountValidator::credentials(self.identifier.value(), self.password.value()) {
            Ok(credentials) => {
                let request = LoginRequest::new(credentials);
                if self.persist {
                    LoginAction::Submit(request)
                } else {
                    LoginAction::Submit(request.without_persistence())
                }
            }
            Err(errors) => {
                self.identifier
                    .set_error(errors.get(FormField::Identifier).map(str::to_string));
                self.password
                    .set_error(errors.get(FormField::Password).map(str::to_string));
                if errors.contains(FormField::Identifier) {
                    self.focus = 1;
                } else {
                    self.focus = 2;
                }
                self.sync_focus();
                LoginAction::None
            }
        }
    }

    /// Handles key event, returns action.
    pub fn handle_key(&mut self, key: KeyEvent) -> LoginAction {
        if self.state == LoginState::Validating {
            return LoginAction::None;
        }
        if self.state == LoginState::Error {
            self.state = LoginState::Input;
            self.error_message = None;
        }

        if events::is_back_event(&key) {
            return LoginAction::Back;
        }
        if events::is_ctrl(&key, 'r') {
            return LoginAction::Register;
        }
        if events::is_ctrl(&key, 'g') {
            return LoginAction::GuestChat;
        }
        if events::is_ctrl(&key, 't') {
            self.persist = !self.persist;
            return LoginAction::None;
        }
        if events::is_submit_event(&key) {
            if self.focused() == Field::Password {
                return self.submit();
            }
            self.move_focus(FocusMove::Next);
            return LoginAction::None;
        }
        if let Some(movement) = events::focus_move(&key) {
            self.move_focus(movement);
            return LoginAction::None;
        }

        match self.focused() {
            Field::Role => {
                if self.role.handle_key(key) {
                    self.role_changed();
                }
            }
            Field::Identifier => {
                self.identifier.handle_key(key);
            }
            Field::Password => {
                self.password.handle_key(key);
            }
        }
        LoginAction::None
    }

    fn render_inner(&self, area: Rect, buf: &mut Buffer) {
        let content_area = centered(area, 60, 19);
        Clear.render(content_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" VitalAI Sign in ");
        let inner = block.inner(content_area);
        block.render(content_area, buf);

        let [title, role, identifier, password, _, remember, _, status, hints] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(1),
            ])
            .areas(inner);

        Paragraph::new("Sign in to access your health portal")
            .style(Style::default().fg(Color::White))
            .render(title, buf);
        (&self.role).render(role, buf);
        (&self.identifier).render(identifier, buf);
        (&self.password).render(password, buf);

        let checkbox = if self.persist { "[x]" } else { "[ ]" };
        Paragraph::new(Line::from(vec![
            Span::styled(checkbox, Style::default().fg(Color::Yellow)),
            Span::raw(" Remember me (Ctrl+T to toggle)"),
        ]))
        .render(remember, buf);

        let status_line = match self.state {
            LoginState::Input => Line::default(),
            LoginState::Validating => Line::from(Span::styled(
                "Signing in...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )),
            LoginState::Error => {
                let msg = self.error_message.as_deref().unwrap_or("Unknown error");
                Line::from(Span::styled(msg.to_string(), Style::default().fg(Color::Red)))
            }
        };
        Paragraph::new(status_line)
            .wrap(Wrap { trim: true })
            .render(status, buf);

        Paragraph::new(Line::from(vec![
            Span::styled("Enter: Sign in", Style::default().fg(Color::DarkGray)),
            Span::raw(" | "),
            Span::styled("Ctrl+R: Register", Style::default().fg(Color::DarkGray)),
            Span::raw(" | "),
            Span::styled("Ctrl+G: Guest chat", Style::default().fg(Color::DarkGray)),
            Span::raw(" | "),
            Span::styled("Esc: Back", Style::default().fg(Color::DarkGray)),
        ]))
        .render(hints, buf);
    }
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Widget for &LoginScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_inner(area, buf);
    }
}
