//! Chat transcript state machine.
//!
//! Every exchange is two steps: the user's message is appended and the
//! conversation becomes pending, then exactly one reply is appended and the
//! pending flag drops. Timing and I/O are left to the caller.

use std::time::Duration;

use super::quick_actions::{QuickAction, canned_reply};
use crate::domain::entities::{ChatMessage, MessageKind, Principal, Sender, Transcript};

/// Delay before a canned reply is shown.
pub const REPLY_DELAY: Duration = Duration::from_millis(1500);

/// Delay between a booking reply and the scheduler opening.
pub const SCHEDULER_DELAY: Duration = Duration::from_millis(1000);

/// Delay before the booking confirmation reply.
pub const CONFIRMATION_DELAY: Duration = Duration::from_millis(500);

/// Reply appended when the chat backend fails.
pub const CHAT_ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Reply acknowledging an uploaded document.
pub const ATTACHMENT_REPLY: &str = "Document received! I've added it to your medical records.";

/// Reply confirming a booking made from chat.
pub const BOOKING_REPLY: &str = "Appointment confirmed! I've added it to your personal calendar.";

/// Opening line from the assistant.
#[must_use]
pub fn greeting(principal: Option<&Principal>) -> String {
    match principal {
        None => "Hello! I'm VitalAI, your medical assistant. You're chatting as a guest. \
                 I can help with symptoms, appointments, and general medical advice. \
                 How can I help you today?"
            .to_string(),
        Some(principal) => format!(
            "Hello {}! I'm VitalAI, your medical assistant. I can help with symptoms, \
             appointments, and general medical advice. How can I help you today?",
            principal.display_name()
        ),
    }
}

/// Transcript plus the pending-reply flag.
#[derive(Debug, Clone)]
pub struct Conversation {
    transcript: Transcript,
    pending: bool,
}

impl Conversation {
    /// Starts a conversation with the assistant's greeting.
    #[must_use]
    pub fn new(principal: Option<&Principal>) -> Self {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::assistant(greeting(principal)));
        Self {
            transcript,
            pending: false,
        }
    }

    /// Messages so far.
    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Whether a reply is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Appends the quick action's message. Returns false while a reply is
    /// pending or when the action navigates away instead.
    pub fn begin_quick_action(&mut self, action: QuickAction) -> bool {
        if self.pending || action.navigates_to_login() {
            return false;
        }
        self.transcript.push(ChatMessage::user(action.key()));
        self.pending = true;
        true
    }

    /// Appends the canned reply for `action`.
    pub fn finish_quick_action(&mut self, action: QuickAction) {
        self.reply(canned_reply(action.key()));
    }

    /// Appends free text. Returns the prompt to forward, or `None` when the
    /// text is blank or a reply is pending.
    pub fn submit(&mut self, text: &str) -> Option<String> {
        let prompt = text.trim();
        if prompt.is_empty() || self.pending {
            return None;
        }
        self.transcript.push(ChatMessage::user(prompt));
        self.pending = true;
        Some(prompt.to_string())
    }

    /// Appends an assistant reply and clears the pending flag.
    pub fn reply(&mut self, text: impl Into<String>) {
        self.transcript.push(ChatMessage::assistant(text));
        self.pending = false;
    }

    /// Appends the backend failure reply.
    pub fn reply_with_error(&mut self) {
        self.reply(CHAT_ERROR_REPLY);
    }

    /// Appends an uploaded-document message. The acknowledgement follows
    /// through [`Conversation::reply`].
    pub fn attach(&mut self, file_name: &str) {
        self.transcript.push(ChatMessage::new(
            Sender::User,
            MessageKind::File,
            format!("Uploaded medical document: {file_name}"),
        ));
        self.pending = true;
    }

    /// Appends a booking notice. The confirmation follows through
    /// [`Conversation::reply`].
    pub fn record_booking(&mut self, notice: impl Into<String>) {
        self.transcript.push(ChatMessage::new(
            Sender::User,
            MessageKind::AppointmentNotice,
            notice,
        ));
        self.pending = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;

    #[test]
    fn test_guest_greeting() {
        let conversation = Conversation::new(None);
        let first = conversation.transcript().last().unwrap();
        assert_eq!(first.sender(), Sender::Assistant);
        assert!(first.text().contains("chatting as a guest"));
    }

    #[test]
    fn test_signed_in_greeting_uses_name() {
        let principal = Principal::new("8001015009087", Role::Patient).with_name("Thandi", "Mokoena");
        assert!(greeting(Some(&principal)).starts_with("Hello Thandi Mokoena!"));
    }

    #[test]
    fn test_quick_action_is_two_steps() {
        let mut conversation = Conversation::new(None);
        assert!(conversation.begin_quick_action(QuickAction::GeneralAdvice));
        assert!(conversation.is_pending());
        assert_eq!(conversation.transcript().last().unwrap().text(), "general advice");

        conversation.finish_quick_action(QuickAction::GeneralAdvice);
        assert!(!conversation.is_pending());
        assert_eq!(conversation.transcript().len(), 3);
        assert_eq!(
            conversation.transcript().last().unwrap().sender(),
            Sender::Assistant
        );
    }

    #[test]
    fn test_login_action_appends_nothing() {
        let mut conversation = Conversation::new(None);
        assert!(!conversation.begin_quick_action(QuickAction::LoginSignUp));
        assert_eq!(conversation.transcript().len(), 1);
    }

    #[test]
    fn test_blank_and_pending_input_ignored() {
        let mut conversation = Conversation::new(None);
        assert_eq!(conversation.submit("   "), None);
        assert_eq!(conversation.submit(" headache "), Some("headache".to_string()));
        assert_eq!(conversation.submit("again"), None);
        assert_eq!(conversation.transcript().len(), 2);

        conversation.reply_with_error();
        assert_eq!(conversation.transcript().last().unwrap().text(), CHAT_ERROR_REPLY);
        assert!(conversation.submit("again").is_some());
    }

    #[test]
    fn test_attachment_message() {
        let mut conversation = Conversation::new(None);
        conversation.attach("bloods.pdf");
        let last = conversation.transcript().last().unwrap();
        assert_eq!(last.kind(), MessageKind::File);
        assert_eq!(last.text(), "Uploaded medical document: bloods.pdf");
    }

    #[test]
    fn test_booking_notice() {
        let mut conversation = Conversation::new(None);
        conversation.record_booking("Appointment scheduled: Dental on 2026-11-02 at 14:30");
        conversation.reply(BOOKING_REPLY);
        let messages = conversation.transcript().messages();
        assert_eq!(messages[1].kind(), MessageKind::AppointmentNotice);
        assert_eq!(messages[2].text(), BOOKING_REPLY);
    }
}
