//! Role dashboards: appointment list with reschedule and cancel, plus the
//! user directory for admins.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, Paragraph, Row, StatefulWidget, Table, TableState, Widget,
        Wrap,
    },
};

use super::layout::{centered, draw, rows};
use crate::domain::entities::{Appointment, AppointmentId, Department, Principal, Role, TimeSlot};
use crate::domain::errors::{FormField, ValidationErrors};
use crate::domain::ports::RescheduleRequest;
use crate::domain::services::BookingValidator;
use crate::presentation::events::{self, step_focus};
use crate::presentation::theme::Theme;
use crate::presentation::widgets::{KeyHints, Select, TextInput};

/// Result of a key press on a dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardAction {
    /// Nothing for the app to do.
    None,
    /// Reload the list (and users for admins).
    Refresh,
    /// The reschedule dialog opened for this appointment and wants its
    /// current record and the bookable slots.
    OpenReschedule(AppointmentId),
    /// Move the appointment to the requested slot.
    Reschedule(AppointmentId, RescheduleRequest),
    /// Confirmed cancellation.
    Cancel(AppointmentId),
    /// Back to the home screen.
    Home,
    /// Open the assistant chat.
    Chat,
    /// End the session.
    SignOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Appointments,
    Users,
}

/// Department, date and slot picker for moving an appointment.
struct RescheduleDialog {
    id: AppointmentId,
    department: Select<Department>,
    date: TextInput,
    time: Select<TimeSlot>,
    focus: usize,
    today: NaiveDate,
    submitting: bool,
    edited: bool,
    alert: Option<String>,
}

const DIALOG_FIELDS: usize = 3;

impl RescheduleDialog {
    fn new(appointment: &Appointment, today: NaiveDate) -> Self {
        let mut dialog = Self {
            id: appointment.id().clone(),
            department: Select::new("Department", Department::ALL),
            date: TextInput::new("New date (YYYY-MM-DD)"),
            time: Select::new("New time", TimeSlot::standard()),
            focus: 1,
            today,
            submitting: false,
            edited: false,
            alert: None,
        };
        dialog.prefill(appointment);
        dialog.sync_focus();
        dialog
    }

    /// Fields start on the booked department and clinic wall-clock slot.
    fn prefill(&mut self, appointment: &Appointment) {
        if let Some(current) = appointment.department() {
            self.department.select(current);
        }
        self.date
            .set_value(appointment.clinic_start().format("%Y-%m-%d").to_string());
        if let Some(slot) = appointment.slot() {
            self.time.select(slot);
        }
    }

    fn sync_focus(&mut self) {
        self.department.set_focused(self.focus == 0);
        self.date.set_focused(self.focus == 1);
        self.time.set_focused(self.focus == 2);
    }

    fn set_errors(&mut self, errors: &ValidationErrors) {
        self.department
            .set_error(errors.get(FormField::Department).map(str::to_string));
        self.date.set_error(errors.get(FormField::Date).map(str::to_string));
        self.time.set_error(errors.get(FormField::Time).map(str::to_string));
    }

    fn submit(&mut self) -> Option<RescheduleRequest> {
        match BookingValidator::reschedule(
            self.department.selected(),
            self.date.value(),
            self.time.selected(),
            self.today,
        ) {
            Ok(request) => {
                self.set_errors(&ValidationErrors::new());
                self.submitting = true;
                self.alert = None;
                Some(request)
            }
            Err(errors) => {
                self.set_errors(&errors);
                None
            }
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(Span::styled(" Reschedule appointment ", theme.title_style));
        let inner = block.inner(area);
        block.render(area, buf);

        let [fields, footer] =
            Layout::vertical([Constraint::Length(9), Constraint::Fill(1)]).areas(inner);
        let field_rows = rows(fields, 3, DIALOG_FIELDS);
        draw(&field_rows, 0, &self.department, buf);
        draw(&field_rows, 1, &self.date, buf);
        draw(&field_rows, 2, &self.time, buf);

        let status = if self.submitting {
            Line::from(Span::styled("Saving...", theme.dimmed_style))
        } else if let Some(alert) = &self.alert {
            Line::from(Span::styled(alert.clone(), theme.error_style))
        } else {
            Line::from(Span::styled("Ctrl+S: save  Esc: close", theme.dimmed_style))
        };
        Paragraph::new(status)
            .wrap(Wrap { trim: true })
            .render(footer, buf);
    }
}

/// Dashboard for one role.
pub struct DashboardScreen {
    role: Role,
    today: NaiveDate,
    appointments: Vec<Appointment>,
    users: Vec<Principal>,
    selected: usize,
    tab: Tab,
    loading: bool,
    reschedule: Option<RescheduleDialog>,
    pending_cancel: Option<AppointmentId>,
}

impl DashboardScreen {
    /// Empty dashboard for `role`. `today` bounds reschedule dates.
    #[must_use]
    pub const fn new(role: Role, today: NaiveDate) -> Self {
        Self {
            role,
            today,
            appointments: Vec::new(),
            users: Vec::new(),
            selected: 0,
            tab: Tab::Appointments,
            loading: false,
            reschedule: None,
            pending_cancel: None,
        }
    }

    /// Role the dashboard was opened for.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Appointments in start order.
    #[must_use]
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Accounts listed on the admin users tab.
    #[must_use]
    pub fn users(&self) -> &[Principal] {
        &self.users
    }

    /// True between a refresh and its result.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Marks a refresh in flight.
    pub const fn set_loading(&mut self) {
        self.loading = true;
    }

    /// Replaces the list and ends loading.
    pub fn set_appointments(&mut self, appointments: Vec<Appointment>) {
        self.appointments = appointments;
        self.loading = false;
        self.clamp_selection();
    }

    /// Replaces the users list.
    pub fn set_users(&mut self, users: Vec<Principal>) {
        self.users = users;
        self.clamp_selection();
    }

    /// Ends loading and keeps the current rows.
    pub fn load_failed(&mut self) {
        self.loading = false;
    }

    /// Offers `slots` in an open reschedule dialog. An empty list keeps the
    /// standard table.
    pub fn set_slots(&mut self, slots: Vec<TimeSlot>) {
        if let Some(dialog) = &mut self.reschedule
            && !slots.is_empty()
        {
            dialog.time.set_options(slots);
        }
    }

    /// Replaces a row with the backend's current record.
    ///
    /// An open dialog for the same appointment is re-filled unless the user
    /// has already changed a field.
    pub fn refreshed(&mut self, appointment: Appointment) {
        if let Some(dialog) = &mut self.reschedule
            && dialog.id == *appointment.id()
            && !dialog.edited
            && !dialog.submitting
        {
            dialog.prefill(&appointment);
        }
        if let Some(existing) = self
            .appointments
            .iter_mut()
            .find(|a| a.id() == appointment.id())
        {
            *existing = appointment;
            self.appointments.sort_by_key(Appointment::starts_at);
        }
    }

    /// Replaces the moved appointment and closes the dialog.
    pub fn rescheduled(&mut self, appointment: Appointment) {
        if let Some(existing) = self
            .appointments
            .iter_mut()
            .find(|a| a.id() == appointment.id())
        {
            *existing = appointment;
        }
        self.appointments.sort_by_key(Appointment::starts_at);
        self.reschedule = None;
    }

    /// Unlocks the dialog and shows `message` over it.
    pub fn reschedule_failed(&mut self, message: impl Into<String>) {
        if let Some(dialog) = &mut self.reschedule {
            dialog.submitting = false;
            dialog.alert = Some(message.into());
        }
    }

    /// Removes a cancelled appointment.
    pub fn cancelled(&mut self, id: &AppointmentId) {
        self.appointments.retain(|a| a.id() != id);
        self.clamp_selection();
    }

    /// Highlighted appointment. `None` on the users tab.
    #[must_use]
    pub fn selected_appointment(&self) -> Option<&Appointment> {
        match self.tab {
            Tab::Appointments => self.appointments.get(self.selected),
            Tab::Users => None,
        }
    }

    fn row_count(&self) -> usize {
        match self.tab {
            Tab::Appointments => self.appointments.len(),
            Tab::Users => self.users.len(),
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.row_count().saturating_sub(1));
    }

    /// Handles `key`, with the reschedule dialog and cancel prompt taking
    /// precedence over list navigation.
    pub fn handle_key(&mut self, key: KeyEvent) -> DashboardAction {
        if let Some(dialog) = &mut self.reschedule {
            let mut close = false;
            let action = Self::handle_dialog_key(dialog, key, &mut close);
            if close {
                self.reschedule = None;
            }
            return action;
        }

        if let Some(id) = self.pending_cancel.take() {
            return match key.code {
                KeyCode::Char('y' | 'Y') => DashboardAction::Cancel(id),
                _ => DashboardAction::None,
            };
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                DashboardAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.row_count() {
                    self.selected += 1;
                }
                DashboardAction::None
            }
            KeyCode::Tab if self.role == Role::Admin => {
                self.tab = match self.tab {
                    Tab::Appointments => Tab::Users,
                    Tab::Users => Tab::Appointments,
                };
                self.selected = 0;
                DashboardAction::None
            }
            KeyCode::Char('r') => {
                self.loading = true;
                DashboardAction::Refresh
            }
            KeyCode::Char('e') => match self.selected_appointment() {
                Some(appointment) => {
                    let id = appointment.id().clone();
                    self.reschedule = Some(RescheduleDialog::new(appointment, self.today));
                    DashboardAction::OpenReschedule(id)
                }
                None => DashboardAction::None,
            },
            KeyCode::Char('x') => {
                self.pending_cancel = self.selected_appointment().map(|a| a.id().clone());
                DashboardAction::None
            }
            KeyCode::Char('c') => DashboardAction::Chat,
            KeyCode::Char('o') => DashboardAction::SignOut,
            KeyCode::Char('h') | KeyCode::Esc => DashboardAction::Home,
            _ => DashboardAction::None,
        }
    }

    fn handle_dialog_key(
        dialog: &mut RescheduleDialog,
        key: KeyEvent,
        close: &mut bool,
    ) -> DashboardAction {
        if dialog.submitting {
            return DashboardAction::None;
        }
        if dialog.alert.take().is_some() {
            return DashboardAction::None;
        }
        if events::is_back_event(&key) {
            *close = true;
            return DashboardAction::None;
        }
        if events::is_ctrl(&key, 's')
            || (events::is_submit_event(&key) && dialog.focus == DIALOG_FIELDS - 1)
        {
            return match dialog.submit() {
                Some(request) => DashboardAction::Reschedule(dialog.id.clone(), request),
                None => DashboardAction::None,
            };
        }
        if events::is_submit_event(&key) {
            dialog.focus = step_focus(dialog.focus, DIALOG_FIELDS, events::FocusMove::Next);
            dialog.sync_focus();
            return DashboardAction::None;
        }
        if let Some(movement) = events::focus_move(&key) {
            dialog.focus = step_focus(dialog.focus, DIALOG_FIELDS, movement);
            dialog.sync_focus();
            return DashboardAction::None;
        }
        dialog.edited = true;
        match dialog.focus {
            0 => {
                dialog.department.handle_key(key);
            }
            1 => {
                dialog.date.handle_key(key);
            }
            _ => {
                dialog.time.handle_key(key);
            }
        }
        DashboardAction::None
    }

    /// Draws the header, active tab, prompts and any open dialog.
    /// `timestamp_format` is applied to the time part of each start.
    pub fn render(
        &self,
        area: Rect,
        buf: &mut Buffer,
        theme: &Theme,
        principal: Option<&Principal>,
        timestamp_format: &str,
    ) {
        let [header, body, prompt, hints] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let welcome = principal.map_or_else(String::new, |p| format!("Welcome, {}", p.display_name()));
        let title = match self.role {
            Role::Patient => "My appointments",
            Role::Staff => "Today's schedule",
            _ => "Clinic overview",
        };
        Paragraph::new(vec![
            Line::from(Span::styled(welcome, theme.title_style)),
            Line::from(Span::styled(
                format!(
                    "{title}{}",
                    if self.loading { "  (loading...)" } else { "" }
                ),
                theme.dimmed_style,
            )),
        ])
        .render(header, buf);

        match self.tab {
            Tab::Appointments => self.render_appointments(body, buf, theme, timestamp_format),
            Tab::Users => self.render_users(body, buf, theme),
        }

        if let Some(id) = &self.pending_cancel {
            Paragraph::new(Span::styled(
                format!("Cancel appointment {id}? Press y to confirm, any other key to keep it."),
                theme.error_style,
            ))
            .render(prompt, buf);
        }

        let mut key_hints = vec![
            ("↑/↓", "Select"),
            ("r", "Refresh"),
            ("e", "Reschedule"),
            ("x", "Cancel"),
            ("c", "Chat"),
            ("h", "Home"),
            ("o", "Sign out"),
        ];
        if self.role == Role::Admin {
            key_hints.push(("Tab", "Users"));
        }
        KeyHints::new(&key_hints)
            .accent(theme.accent)
            .render(hints, buf);

        if let Some(dialog) = &self.reschedule {
            dialog.render(centered(area, 50, 13), buf, theme);
        }
    }

    fn render_appointments(&self, area: Rect, buf: &mut Buffer, theme: &Theme, fmt: &str) {
        let show_patient = self.role != Role::Patient;
        let mut header = vec!["When", "Department", "Reason", "Status"];
        let mut widths = vec![
            Constraint::Length(22),
            Constraint::Length(20),
            Constraint::Fill(1),
            Constraint::Length(12),
        ];
        if show_patient {
            header.insert(1, "Patient");
            widths.insert(1, Constraint::Length(24));
        }

        let rows: Vec<Row> = self
            .appointments
            .iter()
            .map(|appointment| {
                let when = appointment
                    .clinic_start()
                    .format(&format!("%Y-%m-%d {fmt}"))
                    .to_string();
                let mut cells = vec![
                    Cell::from(when),
                    Cell::from(appointment.clinician().to_string()),
                    Cell::from(appointment.reason().to_string()),
                    Cell::from(appointment.status().unwrap_or("booked").to_string()),
                ];
                if show_patient {
                    cells.insert(1, Cell::from(appointment.patient_name().to_string()));
                }
                Row::new(cells)
            })
            .collect();

        let empty = rows.is_empty();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(true))
            .title(" Appointments ");
        if empty {
            let message = if self.loading {
                "Loading appointments..."
            } else {
                "No appointments yet. Book one from the chat (c)."
            };
            Paragraph::new(Span::styled(message, theme.dimmed_style))
                .block(block)
                .render(area, buf);
            return;
        }

        let table = Table::new(rows, widths)
            .header(Row::new(header).style(theme.title_style))
            .block(block)
            .row_highlight_style(theme.selection_style);
        let mut state = TableState::default().with_selected(Some(self.selected));
        StatefulWidget::render(table, area, buf, &mut state);
    }

    fn render_users(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let rows: Vec<Row> = self
            .users
            .iter()
            .map(|user| {
                Row::new(vec![
                    Cell::from(user.identifier().to_string()),
                    Cell::from(user.display_name()),
                    Cell::from(user.role().label()),
                    Cell::from(user.phone().to_string()),
                    Cell::from(user.email().unwrap_or("").to_string()),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Length(16),
                Constraint::Length(24),
                Constraint::Length(10),
                Constraint::Length(14),
                Constraint::Fill(1),
            ],
        )
        .header(Row::new(["Identifier", "Name", "Role", "Phone", "Email"]).style(theme.title_style))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(true))
                .title(" Users "),
        )
        .row_highlight_style(theme.selection_style);
        let mut state = TableState::default().with_selected(Some(self.selected));
        StatefulWidget::render(table, area, buf, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::SlotWindow;
    use chrono::{TimeZone, Utc};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn appointment(id: &str, day: u32) -> Appointment {
        Appointment::new(
            AppointmentId::new(id),
            "Thandi Mokoena",
            "Dental",
            Utc.with_ymd_and_hms(2026, 11, day, 12, 30, 0).unwrap(),
        )
    }

    fn loaded() -> DashboardScreen {
        let mut screen = DashboardScreen::new(Role::Patient, today());
        screen.set_appointments(vec![appointment("a1", 2), appointment("a2", 3)]);
        screen
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut screen = loaded();
        screen.handle_key(key(KeyCode::Down));
        screen.handle_key(key(KeyCode::Down));
        assert_eq!(screen.selected_appointment().unwrap().id().as_str(), "a2");
        screen.handle_key(key(KeyCode::Up));
        screen.handle_key(key(KeyCode::Up));
        assert_eq!(screen.selected_appointment().unwrap().id().as_str(), "a1");
    }

    #[test]
    fn test_cancel_needs_confirmation() {
        let mut screen = loaded();
        assert_eq!(screen.handle_key(key(KeyCode::Char('x'))), DashboardAction::None);
        assert_eq!(screen.handle_key(key(KeyCode::Char('n'))), DashboardAction::None);

        screen.handle_key(key(KeyCode::Char('x')));
        assert_eq!(
            screen.handle_key(key(KeyCode::Char('y'))),
            DashboardAction::Cancel(AppointmentId::new("a1"))
        );
        screen.cancelled(&AppointmentId::new("a1"));
        assert_eq!(screen.appointments().len(), 1);
    }

    #[test]
    fn test_reschedule_dialog_submits_request() {
        let mut screen = loaded();
        assert_eq!(
            screen.handle_key(key(KeyCode::Char('e'))),
            DashboardAction::OpenReschedule(AppointmentId::new("a1"))
        );
        screen.handle_key(key(KeyCode::Down));
        screen.handle_key(key(KeyCode::Right));

        match screen.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)) {
            DashboardAction::Reschedule(id, request) => {
                assert_eq!(id.as_str(), "a1");
                assert_eq!(request.department, Department::Dental);
            }
            other => panic!("expected reschedule, got {other:?}"),
        }

        screen.reschedule_failed("Slot taken");
        assert_eq!(screen.handle_key(key(KeyCode::Char('q'))), DashboardAction::None);
        screen.handle_key(key(KeyCode::Esc));
        assert_eq!(screen.handle_key(key(KeyCode::Char('h'))), DashboardAction::Home);
    }

    fn booked(slot: &str) -> Appointment {
        let window = SlotWindow::on(
            NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            TimeSlot::parse(slot).unwrap(),
        );
        Appointment::new(AppointmentId::new("b1"), "Thandi Mokoena", "Dental", window.starts_at)
    }

    fn screen_text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_unedited_reschedule_keeps_booked_slot() {
        let mut screen = DashboardScreen::new(Role::Patient, today());
        screen.set_appointments(vec![booked("09:30")]);
        screen.handle_key(key(KeyCode::Char('e')));

        match screen.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)) {
            DashboardAction::Reschedule(_, request) => {
                assert_eq!(request.date, NaiveDate::from_ymd_opt(2026, 11, 2).unwrap());
                assert_eq!(request.slot, TimeSlot::parse("09:30").unwrap());
                assert_eq!(request.window().starts_at, booked("09:30").starts_at());
            }
            other => panic!("expected reschedule, got {other:?}"),
        }
    }

    #[test]
    fn test_fresh_record_refills_untouched_dialog() {
        let mut screen = DashboardScreen::new(Role::Patient, today());
        screen.set_appointments(vec![booked("09:30")]);
        screen.handle_key(key(KeyCode::Char('e')));
        screen.refreshed(booked("15:00"));

        assert_eq!(screen.appointments()[0].slot(), TimeSlot::parse("15:00"));
        match screen.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)) {
            DashboardAction::Reschedule(_, request) => {
                assert_eq!(request.slot, TimeSlot::parse("15:00").unwrap());
            }
            other => panic!("expected reschedule, got {other:?}"),
        }
    }

    #[test]
    fn test_fresh_record_keeps_user_edits() {
        let mut screen = DashboardScreen::new(Role::Patient, today());
        screen.set_appointments(vec![booked("09:30")]);
        screen.handle_key(key(KeyCode::Char('e')));
        screen.handle_key(key(KeyCode::Down));
        screen.handle_key(key(KeyCode::Right));
        screen.refreshed(booked("15:00"));

        match screen.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)) {
            DashboardAction::Reschedule(_, request) => {
                assert_eq!(request.slot, TimeSlot::parse("10:00").unwrap());
            }
            other => panic!("expected reschedule, got {other:?}"),
        }
    }

    #[test]
    fn test_list_shows_booked_slot() {
        let mut screen = DashboardScreen::new(Role::Patient, today());
        screen.set_appointments(vec![booked("14:30")]);

        let area = Rect::new(0, 0, 100, 12);
        let mut buf = Buffer::empty(area);
        screen.render(area, &mut buf, &Theme::new("cyan"), None, "%H:%M");

        assert!(screen_text(&buf).contains("2026-11-02 14:30"));
    }

    #[test]
    fn test_reschedule_into_past_is_rejected() {
        let mut screen = DashboardScreen::new(Role::Staff, today());
        screen.set_appointments(vec![Appointment::new(
            AppointmentId::new("old"),
            "Sipho Dlamini",
            "Cardiology",
            Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap(),
        )]);
        screen.handle_key(key(KeyCode::Char('e')));
        assert_eq!(
            screen.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            DashboardAction::None
        );
    }

    #[test]
    fn test_admin_switches_to_users() {
        let mut screen = DashboardScreen::new(Role::Admin, today());
        screen.set_users(vec![Principal::new("8001015009087", Role::Patient)]);
        screen.handle_key(key(KeyCode::Tab));
        assert!(screen.selected_appointment().is_none());
        assert_eq!(screen.handle_key(key(KeyCode::Char('e'))), DashboardAction::None);
    }

    #[test]
    fn test_patient_ignores_tab() {
        let mut screen = loaded();
        screen.handle_key(key(KeyCode::Tab));
        assert!(screen.selected_appointment().is_some());
    }
}
