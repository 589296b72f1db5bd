//! Assistant chat screen with the appointment scheduler modal.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::booking_form::{BookingFormView, FormAction};
use super::layout::centered;
use crate::application::services::{Conversation, QuickAction};
use crate::domain::entities::{Principal, TimeSlot};
use crate::domain::errors::ValidationErrors;
use crate::domain::services::BookingForm;
use crate::presentation::events;
use crate::presentation::theme::Theme;
use crate::presentation::widgets::{KeyHints, TextInput, TranscriptView};

const ATTACH_COMMAND: &str = "/attach";
const SCROLL_STEP: usize = 5;

/// Result of a key press on the chat screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    /// Nothing for the app to do.
    None,
    /// Prompt already appended to the transcript, to forward to the backend.
    Send(String),
    /// Quick action already appended, awaiting its canned reply.
    QuickAction(QuickAction),
    /// "Login / Sign up" quick action.
    Login,
    /// Path typed after `/attach`.
    Attach(String),
    /// Scheduler form submitted.
    SubmitBooking(BookingForm),
    /// Leave the chat.
    Back,
}

/// Chat transcript, input line and optional scheduler.
pub struct ChatScreen {
    conversation: Conversation,
    input: TextInput,
    scheduler: Option<BookingFormView>,
    signed_in: bool,
    scroll: usize,
}

impl ChatScreen {
    /// Greets `principal`, or a guest when `None`.
    #[must_use]
    pub fn new(principal: Option<&Principal>) -> Self {
        let mut input = TextInput::new("Message")
            .placeholder("Describe your symptoms or ask a question (/attach <file> to upload)");
        input.set_focused(true);
        Self {
            conversation: Conversation::new(principal),
            input,
            scheduler: None,
            signed_in: principal.is_some(),
            scroll: 0,
        }
    }

    /// Transcript and pending state.
    #[must_use]
    pub const fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Mutable conversation. Scrolls back to the newest message.
    pub fn conversation_mut(&mut self) -> &mut Conversation {
        self.scroll = 0;
        &mut self.conversation
    }

    /// Quick actions offered to this visitor.
    #[must_use]
    pub fn quick_actions(&self) -> &'static [QuickAction] {
        QuickAction::available(self.signed_in)
    }

    /// True while the booking form covers the transcript.
    #[must_use]
    pub const fn scheduler_open(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Opens the scheduler, prefilled from `principal` when signed in.
    pub fn open_scheduler(&mut self, today: NaiveDate, principal: Option<&Principal>) {
        let mut form = BookingFormView::new("Schedule an appointment", today);
        if let Some(principal) = principal {
            form.prefill(principal);
        }
        self.scheduler = Some(form);
    }

    /// Passes bookable slots to an open scheduler.
    pub fn set_slots(&mut self, slots: Vec<TimeSlot>) {
        if let Some(form) = &mut self.scheduler {
            form.set_slots(slots);
        }
    }

    /// Keeps the scheduler open with its input and shows `message`.
    pub fn booking_failed(&mut self, message: impl Into<String>) {
        if let Some(form) = &mut self.scheduler {
            form.set_alert(message);
        }
    }

    /// Marks the fields the validator rejected.
    pub fn booking_rejected(&mut self, errors: &ValidationErrors) {
        if let Some(form) = &mut self.scheduler {
            form.set_errors(errors);
        }
    }

    /// Closes the scheduler and records the booking notice.
    pub fn booking_succeeded(&mut self, notice: String) {
        self.scheduler = None;
        self.conversation_mut().record_booking(notice);
    }

    /// Routes `key` to the scheduler when open, else to the input line.
    ///
    /// F1, F2 and onward pick the matching quick action.
    pub fn handle_key(&mut self, key: KeyEvent) -> ChatAction {
        if let Some(form) = &mut self.scheduler {
            return match form.handle_key(key) {
                FormAction::Submit(booking) => {
                    form.set_submitting(true);
                    ChatAction::SubmitBooking(booking)
                }
                FormAction::Cancel => {
                    self.scheduler = None;
                    ChatAction::None
                }
                FormAction::None => ChatAction::None,
            };
        }

        if events::is_back_event(&key) {
            return ChatAction::Back;
        }

        match key.code {
            KeyCode::F(n) => self.quick_action(usize::from(n).saturating_sub(1)),
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_add(SCROLL_STEP);
                ChatAction::None
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_sub(SCROLL_STEP);
                ChatAction::None
            }
            KeyCode::Enter => self.submit_input(),
            _ => {
                self.input.handle_key(key);
                ChatAction::None
            }
        }
    }

    fn quick_action(&mut self, index: usize) -> ChatAction {
        let Some(&action) = self.quick_actions().get(index) else {
            return ChatAction::None;
        };
        if action.navigates_to_login() {
            return ChatAction::Login;
        }
        if self.conversation_mut().begin_quick_action(action) {
            ChatAction::QuickAction(action)
        } else {
            ChatAction::None
        }
    }

    fn submit_input(&mut self) -> ChatAction {
        let text = self.input.value().to_string();
        if let Some(rest) = text.trim_start().strip_prefix(ATTACH_COMMAND) {
            let path = rest.trim();
            if path.is_empty() || self.conversation.is_pending() {
                return ChatAction::None;
            }
            let path = path.to_string();
            self.input.clear();
            return ChatAction::Attach(path);
        }
        match self.conversation_mut().submit(&text) {
            Some(prompt) => {
                self.input.clear();
                ChatAction::Send(prompt)
            }
            None => ChatAction::None,
        }
    }

    /// Draws the transcript, quick actions and input, with the scheduler on top.
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme, timestamp_format: &str) {
        let [transcript, actions, input, hints] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

        TranscriptView::new(self.conversation.transcript(), theme, timestamp_format)
            .pending(self.conversation.is_pending())
            .scroll(self.scroll)
            .render(transcript, buf);

        let mut spans = Vec::new();
        for (i, action) in self.quick_actions().iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(format!("F{}", i + 1), theme.title_style));
            spans.push(Span::raw(format!(" {}", action.label())));
        }
        Paragraph::new(Line::from(spans)).render(actions, buf);

        (&self.input).render(input, buf);

        KeyHints::new(&[
            ("Enter", "Send"),
            ("PgUp/PgDn", "Scroll"),
            ("Esc", "Back"),
            ("Ctrl+Q", "Quit"),
        ])
        .accent(theme.accent)
        .render(hints, buf);

        if let Some(form) = &self.scheduler {
            form.render(centered(area, 96, 19), buf, theme);
        }
    }
}
