//! Walk-in kiosk: backend health plus the booking form, no session needed.

use chrono::NaiveDate;
use crossterm::event::KeyEvent;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use super::booking_form::{BookingFormView, FormAction};
use super::layout::centered;
use crate::domain::connection::BackendStatus;
use crate::domain::entities::TimeSlot;
use crate::domain::errors::ValidationErrors;
use crate::domain::services::BookingForm;
use crate::presentation::events;
use crate::presentation::theme::Theme;
use crate::presentation::widgets::KeyHints;

/// Result of a key press on the kiosk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KioskAction {
    /// Nothing for the app to do.
    None,
    /// Walk-in booking to validate and send.
    Submit(BookingForm),
    /// Re-check the backend.
    CheckHealth,
    /// Leave the kiosk.
    Back,
}

/// Walk-in booking without an account.
pub struct KioskScreen {
    form: BookingFormView,
    today: NaiveDate,
    confirmation: Option<String>,
}

impl KioskScreen {
    /// Empty form for bookings from the day after `today`.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            form: BookingFormView::new("Book a walk-in appointment", today),
            today,
            confirmation: None,
        }
    }

    /// Fresh form for the next visitor.
    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    /// Offers the backend's bookable slots.
    pub fn set_slots(&mut self, slots: Vec<TimeSlot>) {
        self.form.set_slots(slots);
    }

    /// Shows `message` over the form and keeps the input.
    pub fn booking_failed(&mut self, message: impl Into<String>) {
        self.form.set_alert(message);
    }

    /// Marks the fields the validator rejected.
    pub fn booking_rejected(&mut self, errors: &ValidationErrors) {
        self.form.set_errors(errors);
    }

    /// Clears the form and shows `notice` until the next key.
    pub fn booking_succeeded(&mut self, notice: String) {
        self.form = BookingFormView::new("Book a walk-in appointment", self.today);
        self.confirmation = Some(notice);
    }

    /// Confirmation of the last booking, until the next key.
    #[must_use]
    pub fn confirmation(&self) -> Option<&str> {
        self.confirmation.as_deref()
    }

    /// Ctrl+R re-checks the backend. Other keys go to the form.
    pub fn handle_key(&mut self, key: KeyEvent) -> KioskAction {
        if self.confirmation.take().is_some() {
            return KioskAction::None;
        }
        if events::is_ctrl(&key, 'r') && !self.form.is_submitting() {
            return KioskAction::CheckHealth;
        }
        match self.form.handle_key(key) {
            FormAction::Submit(booking) => {
                self.form.set_submitting(true);
                KioskAction::Submit(booking)
            }
            FormAction::Cancel => KioskAction::Back,
            FormAction::None => KioskAction::None,
        }
    }

    /// Draws the health line, the form and any confirmation.
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme, health: BackendStatus) {
        let [status, form, hints] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let health_color = match health {
            BackendStatus::Online => Color::Green,
            BackendStatus::Offline => Color::Red,
            BackendStatus::Checking | BackendStatus::Unknown => Color::Yellow,
        };
        Paragraph::new(Line::from(vec![
            Span::styled("Walk-in kiosk", theme.title_style),
            Span::raw("   Service: "),
            Span::styled(format!("● {}", health.label()), Style::default().fg(health_color)),
        ]))
        .render(status, buf);

        self.form.render(form, buf, theme);

        KeyHints::new(&[("Ctrl+S", "Book"), ("Ctrl+R", "Check service"), ("Esc", "Back")])
            .accent(theme.accent)
            .render(hints, buf);

        if let Some(notice) = &self.confirmation {
            let popup = centered(area, 60, 7);
            Clear.render(popup, buf);
            Paragraph::new(vec![
                Line::from(Span::styled(notice.clone(), theme.success_style)),
                Line::default(),
                Line::from(Span::styled("Press any key for the next visitor.", theme.dimmed_style)),
            ])
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.success_style)
                    .title(" Booked "),
            )
            .render(popup, buf);
        }
    }
}
