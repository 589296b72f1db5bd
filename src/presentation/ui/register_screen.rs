//! Registration screen.

use crossterm::event::KeyEvent;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use super::layout::{centered, draw, rows};
use crate::domain::entities::{IdentityType, LANGUAGES};
use crate::domain::errors::{FormField, ValidationErrors};
use crate::domain::ports::RegistrationRequest;
use crate::domain::services::{AccountValidator, RegistrationForm};
use crate::presentation::events::{self, FocusMove, step_focus};
use crate::presentation::widgets::{Select, TextInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    IdType,
    Identifier,
    FirstName,
    LastName,
    Phone,
    Email,
    Password,
    ConfirmPassword,
    Language,
}

const FIELDS: [Field; 9] = [
    Field::IdType,
    Field::Identifier,
    Field::FirstName,
    Field::LastName,
    Field::Phone,
    Field::Email,
    Field::Password,
    Field::ConfirmPassword,
    Field::Language,
];

/// Result of a key press on the registration form.
#[derive(Debug)]
pub enum RegisterAction {
    /// Nothing for the app to do.
    None,
    /// Registration that passed local validation.
    Submit(RegistrationRequest),
    /// Switch to sign-in.
    Login,
    /// Back to home.
    Back,
}

/// Patient registration form.
pub struct RegisterScreen {
    id_type: Select<IdentityType>,
    identifier: TextInput,
    first_name: TextInput,
    last_name: TextInput,
    phone: TextInput,
    email: TextInput,
    password: TextInput,
    confirm_password: TextInput,
    language: Select<&'static str>,
    focus: usize,
    submitting: bool,
    message: Option<(String, bool)>,
}

impl RegisterScreen {
    /// Empty form for a national id holder, in the first language.
    #[must_use]
    pub fn new() -> Self {
        let kind = IdentityType::default();
        let mut screen = Self {
            id_type: Select::new("ID type", IdentityType::ALL).with_selected(kind),
            identifier: TextInput::new(kind.label()).placeholder(kind.placeholder()),
            first_name: TextInput::new("First name"),
            last_name: TextInput::new("Last name"),
            phone: TextInput::new("Phone number"),
            email: TextInput::new("Email (optional)"),
            password: TextInput::new("Password").password(),
            confirm_password: TextInput::new("Confirm password").password(),
            language: Select::new("Preferred language", LANGUAGES).with_selected(LANGUAGES[0]),
            focus: 0,
            submitting: false,
            message: None,
        };
        screen.sync_focus();
        screen
    }

    /// Clears every field.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// True while the request is in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Locks the form and clears the message line.
    pub fn set_submitting(&mut self) {
        self.submitting = true;
        self.message = None;
    }

    /// Unlocks the form and shows `message` as an error.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.message = Some((message.into(), true));
    }

    /// Unlocks the form and shows `message` as information.
    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.message = Some((message.into(), false));
    }

    /// Snapshot of the current input.
    #[must_use]
    pub fn form(&self) -> RegistrationForm {
        RegistrationForm {
            identifier_type: self.id_type.selected().unwrap_or_default(),
            identifier: self.identifier.value().to_string(),
            first_name: self.first_name.value().to_string(),
            last_name: self.last_name.value().to_string(),
            phone: self.phone.value().to_string(),
            email: self.email.value().to_string(),
            password: self.password.value().to_string(),
            confirm_password: self.confirm_password.value().to_string(),
            language: self.language.selected().unwrap_or(LANGUAGES[0]).to_string(),
        }
    }

    fn focused(&self) -> Field {
        FIELDS[self.focus]
    }

    fn sync_focus(&mut self) {
        let focused = self.focused();
        self.id_type.set_focused(focused == Field::IdType);
        self.identifier.set_focused(focused == Field::Identifier);
        self.first_name.set_focused(focused == Field::FirstName);
        self.last_name.set_focused(focused == Field::LastName);
        self.phone.set_focused(focused == Field::Phone);
        self.email.set_focused(focused == Field::Email);
        self.password.set_focused(focused == Field::Password);
        self.confirm_password
            .set_focused(focused == Field::ConfirmPassword);
        self.language.set_focused(focused == Field::Language);
    }

    fn move_focus(&mut self, movement: FocusMove) {
        self.focus = step_focus(self.focus, FIELDS.len(), movement);
        self.sync_focus();
    }

    fn id_type_changed(&mut self) {
        let kind = self.id_type.selected().unwrap_or_default();
        self.identifier.set_label(kind.label());
        self.identifier.set_placeholder(kind.placeholder());
        self.identifier.clear();
        self.identifier.set_error(None);
    }

    fn normalize_identifier(&mut self) {
        let kind = self.id_type.selected().unwrap_or_default();
        let normalized = kind.normalize(self.identifier.value());
        if normalized != self.identifier.value() {
            self.identifier.set_value(normalized);
        }
    }

    fn show_errors(&mut self, errors: &ValidationErrors) {
        let message = |field| errors.get(field).map(str::to_string);
        self.identifier.set_error(message(FormField::Identifier));
        self.first_name.set_error(message(FormField::FirstName));
        self.last_name.set_error(message(FormField::LastName));
        self.phone.set_error(message(FormField::Phone));
        self.password.set_error(message(FormField::Password));
        self.confirm_password
            .set_error(message(FormField::ConfirmPassword));

        if let Some(first) = errors.first() {
            let target = match first.field {
                FormField::FirstName => Field::FirstName,
                FormField::LastName => Field::LastName,
                FormField::Phone => Field::Phone,
                FormField::Password => Field::Password,
                FormField::ConfirmPassword => Field::ConfirmPassword,
                _ => Field::Identifier,
            };
            self.focus = FIELDS.iter().position(|f| *f == target).unwrap_or(0);
            self.sync_focus();
        }
    }

    fn submit(&mut self) -> RegisterAction {
        match AccountValidator::registration(&self.form()) {
            Ok(request) => RegisterAction::Submit(request),
            Err(errors) => {
                self.show_errors(&errors);
                RegisterAction::None
            }
        }
    }

    /// Handles `key`. Changing the id type clears the id number. Ctrl+S
    /// or Enter on the last field validates and submits.
    pub fn handle_key(&mut self, key: KeyEvent) -> RegisterAction {
        if self.submitting {
            return RegisterAction::None;
        }
        if events::is_back_event(&key) {
            return RegisterAction::Back;
        }
        if events::is_ctrl(&key, 'l') {
            return RegisterAction::Login;
        }
        if events::is_ctrl(&key, 's') {
            return self.submit();
        }
        if events::is_submit_event(&key) {
            if self.focus == FIELDS.len() - 1 {
                return self.submit();
            }
            self.move_focus(FocusMove::Next);
            return RegisterAction::None;
        }
        if let Some(movement) = events::focus_move(&key) {
            self.move_focus(movement);
            return RegisterAction::None;
        }

        match self.focused() {
            Field::IdType => {
                if self.id_type.handle_key(key) {
                    self.id_type_changed();
                }
            }
            Field::Identifier => {
                if self.identifier.handle_key(key) {
                    self.normalize_identifier();
                }
            }
            Field::FirstName => {
                self.first_name.handle_key(key);
            }
            Field::LastName => {
                self.last_name.handle_key(key);
            }
            Field::Phone => {
                self.phone.handle_key(key);
            }
            Field::Email => {
                self.email.handle_key(key);
            }
            Field::Password => {
                self.password.handle_key(key);
            }
            Field::ConfirmPassword => {
                self.confirm_password.handle_key(key);
            }
            Field::Language => {
                self.language.handle_key(key);
            }
        }
        RegisterAction::None
    }
}

impl Default for RegisterScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &RegisterScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let content_area = centered(area, 84, 22);
        Clear.render(content_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Create your VitalAI account ");
        let inner = block.inner(content_area);
        block.render(content_area, buf);

        let [fields, status, hints] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .areas(inner);
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(fields);
        let left_rows = rows(left, 3, 5);
        let right_rows = rows(right, 3, 4);

        draw(&left_rows, 0, &self.id_type, buf);
        draw(&left_rows, 1, &self.identifier, buf);
        draw(&left_rows, 2, &self.first_name, buf);
        draw(&left_rows, 3, &self.last_name, buf);
        draw(&left_rows, 4, &self.phone, buf);
        draw(&right_rows, 0, &self.email, buf);
        draw(&right_rows, 1, &self.password, buf);
        draw(&right_rows, 2, &self.confirm_password, buf);
        draw(&right_rows, 3, &self.language, buf);

        let status_line = match (&self.message, self.submitting) {
            (_, true) => Line::from(Span::styled(
                "Creating account...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )),
            (Some((message, true)), false) => {
                Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red)))
            }
            (Some((message, false)), false) => {
                Line::from(Span::styled(message.clone(), Style::default().fg(Color::Green)))
            }
            (None, false) => Line::default(),
        };
        Paragraph::new(status_line)
            .wrap(Wrap { trim: true })
            .render(status, buf);

        Paragraph::new(Span::styled(
            "Tab: next field | Ctrl+S: Create account | Ctrl+L: Sign in | Esc: Back",
            Style::default().fg(Color::DarkGray),
        ))
        .render(hints, buf);
    }
}
