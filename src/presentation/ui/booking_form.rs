//! Appointment form shared by the chat scheduler and the kiosk.

use chrono::NaiveDate;
use crossterm::event::KeyEvent;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use super::layout::{draw, rows};
use crate::domain::entities::{Department, IdentityType, Principal, TimeSlot};
use crate::domain::errors::{FormField, ValidationErrors};
use crate::domain::services::{BookingForm, BookingValidator};
use crate::presentation::events::{self, step_focus};
use crate::presentation::theme::Theme;
use crate::presentation::widgets::{Select, TextInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    FirstName,
    LastName,
    IdType,
    IdNumber,
    Department,
    Date,
    Time,
    Reason,
}

const FIELDS: [Field; 8] = [
    Field::FirstName,
    Field::LastName,
    Field::IdType,
    Field::IdNumber,
    Field::Department,
    Field::Date,
    Field::Time,
    Field::Reason,
];

/// What a key press on the form asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Handled inside the form.
    None,
    /// Input to validate and book.
    Submit(BookingForm),
    /// Form dismissed.
    Cancel,
}

/// Appointment form state.
pub struct BookingFormView {
    title: &'static str,
    first_name: TextInput,
    last_name: TextInput,
    id_type: Select<IdentityType>,
    id_number: TextInput,
    department: Select<Department>,
    date: TextInput,
    time: Select<TimeSlot>,
    reason: TextInput,
    focus: usize,
    submitting: bool,
    alert: Option<String>,
}

impl BookingFormView {
    /// Empty form with the date placeholder set to the earliest bookable day.
    #[must_use]
    pub fn new(title: &'static str, today: NaiveDate) -> Self {
        let earliest = BookingValidator::earliest_date(today);
        let mut view = Self {
            title,
            first_name: TextInput::new("First name"),
            last_name: TextInput::new("Last name"),
            id_type: Select::new("ID type", IdentityType::ALL),
            id_number: TextInput::new("ID number").placeholder("Select an ID type first"),
            department: Select::new("Department", Department::ALL),
            date: TextInput::new("Date (YYYY-MM-DD)")
                .placeholder(format!("{} or later", earliest.format("%Y-%m-%d"))),
            time: Select::new("Time", TimeSlot::standard()),
            reason: TextInput::new("Reason (optional)"),
            focus: 0,
            submitting: false,
            alert: None,
        };
        view.sync_focus();
        view
    }

    /// Fills the patient's name from the signed-in principal.
    pub fn prefill(&mut self, principal: &Principal) {
        self.first_name.set_value(principal.first_name());
        self.last_name.set_value(principal.last_name());
    }

    /// Offers `slots` instead of the standard table.
    pub fn set_slots(&mut self, slots: Vec<TimeSlot>) {
        if !slots.is_empty() {
            self.time.set_options(slots);
        }
    }

    /// Snapshot of the current input.
    #[must_use]
    pub fn form(&self) -> BookingForm {
        BookingForm {
            first_name: self.first_name.value().to_string(),
            last_name: self.last_name.value().to_string(),
            id_type: self.id_type.selected(),
            id_number: self.id_number.value().to_string(),
            department: self.department.selected(),
            date: self.date.value().to_string(),
            slot: self.time.selected(),
            reason: self.reason.value().to_string(),
        }
    }

    /// True while a booking request is in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Locks or unlocks the form. Locking clears the alert.
    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
        if submitting {
            self.alert = None;
        }
    }

    /// Shows a blocking alert above the form. Input is kept.
    pub fn set_alert(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.alert = Some(message.into());
    }

    /// Blocking alert, if one is shown.
    #[must_use]
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Marks each failing field and focuses the first one.
    pub fn set_errors(&mut self, errors: &ValidationErrors) {
        self.submitting = false;
        let message = |field| errors.get(field).map(str::to_string);
        self.first_name.set_error(message(FormField::FirstName));
        self.last_name.set_error(message(FormField::LastName));
        self.id_type.set_error(message(FormField::IdType));
        self.id_number.set_error(message(FormField::IdNumber));
        self.department.set_error(message(FormField::Department));
        self.date.set_error(message(FormField::Date));
        self.time.set_error(message(FormField::Time));

        if let Some(first) = errors.first() {
            let target = match first.field {
                FormField::LastName => Field::LastName,
                FormField::IdType => Field::IdType,
                FormField::IdNumber => Field::IdNumber,
                FormField::Department => Field::Department,
                FormField::Date => Field::Date,
                FormField::Time => Field::Time,
                _ => Field::FirstName,
            };
            self.focus = FIELDS.iter().position(|f| *f == target).unwrap_or(0);
            self.sync_focus();
        }
    }

    fn focused(&self) -> Field {
        FIELDS[self.focus]
    }

    fn sync_focus(&mut self) {
        let focused = self.focused();
        self.first_name.set_focused(focused == Field::FirstName);
        self.last_name.set_focused(focused == Field::LastName);
        self.id_type.set_focused(focused == Field::IdType);
        self.id_number.set_focused(focused == Field::IdNumber);
        self.department.set_focused(focused == Field::Department);
        self.date.set_focused(focused == Field::Date);
        self.time.set_focused(focused == Field::Time);
        self.reason.set_focused(focused == Field::Reason);
    }

    fn id_type_changed(&mut self) {
        let mut form = BookingForm {
            id_type: None,
            id_number: self.id_number.value().to_string(),
            ..BookingForm::default()
        };
        if let Some(kind) = self.id_type.selected() {
            form.set_id_type(kind);
            self.id_number.set_label(kind.label());
            self.id_number.set_placeholder(kind.placeholder());
        }
        self.id_number.set_value(form.id_number);
        self.id_number.set_error(None);
    }

    fn normalize_id_number(&mut self) {
        let mut form = BookingForm {
            id_type: self.id_type.selected(),
            ..BookingForm::default()
        };
        form.set_id_number(self.id_number.value());
        if form.id_number != self.id_number.value() {
            self.id_number.set_value(form.id_number);
        }
    }

    /// Handles a key while the form is open.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if self.submitting {
            return FormAction::None;
        }
        if self.alert.is_some() {
            self.alert = None;
            return FormAction::None;
        }
        if events::is_back_event(&key) {
            return FormAction::Cancel;
        }
        if events::is_ctrl(&key, 's')
            || (events::is_submit_event(&key) && self.focus == FIELDS.len() - 1)
        {
            return FormAction::Submit(self.form());
        }
        if events::is_submit_event(&key) {
            self.focus = step_focus(self.focus, FIELDS.len(), events::FocusMove::Next);
            self.sync_focus();
            return FormAction::None;
        }
        if let Some(movement) = events::focus_move(&key) {
            self.focus = step_focus(self.focus, FIELDS.len(), movement);
            self.sync_focus();
            return FormAction::None;
        }

        match self.focused() {
            Field::FirstName => {
                self.first_name.handle_key(key);
            }
            Field::LastName => {
                self.last_name.handle_key(key);
            }
            Field::IdType => {
                if self.id_type.handle_key(key) {
                    self.id_type_changed();
                }
            }
            Field::IdNumber => {
                if self.id_number.handle_key(key) {
                    self.normalize_id_number();
                }
            }
            Field::Department => {
                self.department.handle_key(key);
            }
            Field::Date => {
                self.date.handle_key(key);
            }
            Field::Time => {
                self.time.handle_key(key);
            }
            Field::Reason => {
                self.reason.handle_key(key);
            }
        }
        FormAction::None
    }

    /// Renders the form into `area`, clearing it first.
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(Span::styled(format!(" {} ", self.title), theme.title_style));
        let inner = block.inner(area);
        block.render(area, buf);

        let [fields_area, footer] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(2)]).areas(inner);
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(fields_area);

        let left_rows = rows(left, 3, 4);
        let right_rows = rows(right, 3, 4);
        draw(&left_rows, 0, &self.first_name, buf);
        draw(&left_rows, 1, &self.last_name, buf);
        draw(&left_rows, 2, &self.id_type, buf);
        draw(&left_rows, 3, &self.id_number, buf);
        draw(&right_rows, 0, &self.department, buf);
        draw(&right_rows, 1, &self.date, buf);
        draw(&right_rows, 2, &self.time, buf);
        draw(&right_rows, 3, &self.reason, buf);

        let status = if self.submitting {
            Line::from(Span::styled("Booking appointment...", theme.dimmed_style))
        } else if let Some(alert) = &self.alert {
            Line::from(Span::styled(format!("{alert} (any key to continue)"), theme.error_style))
        } else {
            Line::from(Span::styled(
                "Tab/Up/Down: move  Left/Right: choose  Ctrl+S: book  Esc: close",
                theme.dimmed_style,
            ))
        };
        Paragraph::new(status)
            .wrap(Wrap { trim: true })
            .render(footer, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn type_text(view: &mut BookingFormView, text: &str) {
        for c in text.chars() {
            view.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_prefill_from_principal() {
        let mut view = BookingFormView::new("Book", today());
        view.prefill(&Principal::new("8001015009087", Role::Patient).with_name("Thandi", "Mokoena"));
        let form = view.form();
        assert_eq!(form.first_name, "Thandi");
        assert_eq!(form.last_name, "Mokoena");
    }

    #[test]
    fn test_id_number_normalized_for_type() {
        let mut view = BookingFormView::new("Book", today());
        view.focus = 2;
        view.sync_focus();
        view.handle_key(key(KeyCode::Right));
        assert_eq!(view.form().id_type, Some(IdentityType::NationalId));

        view.handle_key(key(KeyCode::Tab));
        type_text(&mut view, "800a1");
        assert_eq!(view.form().id_number, "8001");
    }

    #[test]
    fn test_changing_id_type_clears_number() {
        let mut view = BookingFormView::new("Book", today());
        view.id_type.select(IdentityType::Passport);
        view.id_number.set_value("A1234567");

        view.focus = 2;
        view.sync_focus();
        view.handle_key(key(KeyCode::Right));

        assert_eq!(view.form().id_type, Some(IdentityType::FileNumber));
        assert!(view.form().id_number.is_empty());
    }

    #[test]
    fn test_enter_on_last_field_submits() {
        let mut view = BookingFormView::new("Book", today());
        for _ in 0..FIELDS.len() - 1 {
            assert_eq!(view.handle_key(key(KeyCode::Enter)), FormAction::None);
        }
        assert!(matches!(view.handle_key(key(KeyCode::Enter)), FormAction::Submit(_)));
    }

    #[test]
    fn test_errors_focus_first_field() {
        let mut view = BookingFormView::new("Book", today());
        view.focus = 5;
        let errors = BookingValidator::validate(&view.form(), today()).unwrap_err();
        view.set_errors(&errors);
        assert_eq!(view.focused(), Field::FirstName);
        assert!(view.first_name.error().is_some());
    }

    #[test]
    fn test_alert_swallows_next_key() {
        let mut view = BookingFormView::new("Book", today());
        view.set_alert("Slot already taken");
        assert_eq!(view.handle_key(key(KeyCode::Esc)), FormAction::None);
        assert!(view.alert().is_none());
        assert_eq!(view.handle_key(key(KeyCode::Esc)), FormAction::Cancel);
    }
}
