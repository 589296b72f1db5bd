//! Chat transcript entities.

use chrono::{DateTime, Local};
use uuid::Uuid;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    /// The person at the terminal.
    User,
    /// The assistant backend or a canned reply.
    Assistant,
}

/// What a chat message represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Plain text.
    Text,
    /// Notice that a document was attached.
    File,
    /// Notice that an appointment was booked.
    AppointmentNotice,
}

/// One entry of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    id: Uuid,
    sender: Sender,
    kind: MessageKind,
    text: String,
    timestamp: DateTime<Local>,
}

impl ChatMessage {
    /// Creates a message stamped with the current local time.
    #[must_use]
    pub fn new(sender: Sender, kind: MessageKind, text: impl Into<String>) -> Self {
        Self::at(sender, kind, text, Local::now())
    }

    /// Creates a message with an explicit timestamp.
    #[must_use]
    pub fn at(
        sender: Sender,
        kind: MessageKind,
        text: impl Into<String>,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            kind,
            text: text.into(),
            timestamp,
        }
    }

    /// Text message from the user.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, MessageKind::Text, text)
    }

    /// Text message from the assistant.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, MessageKind::Text, text)
    }

    /// Unique id, stable for the life of the message.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Who wrote it.
    #[must_use]
    pub const fn sender(&self) -> Sender {
        self.sender
    }

    /// Text or notice.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Message body.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// When it was appended, in the terminal's zone.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}

/// Append-only, ordered chat transcript.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// Empty transcript.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Appends a message at the end.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Messages in order of arrival.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Newest message.
    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True before the greeting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("hello"));
        transcript.push(ChatMessage::assistant("hi"));

        let senders: Vec<_> = transcript.messages().iter().map(ChatMessage::sender).collect();
        assert_eq!(senders, vec![Sender::User, Sender::Assistant]);
        assert_eq!(transcript.last().map(ChatMessage::text), Some("hi"));
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = ChatMessage::user("a");
        let b = ChatMessage::user("a");
        assert_ne!(a.id(), b.id());
    }
}
