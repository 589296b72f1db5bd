//! Application services shared by the presentation layer.

mod conversation;
mod quick_actions;
mod session_controller;

pub use conversation::{
    ATTACHMENT_REPLY, BOOKING_REPLY, CHAT_ERROR_REPLY, CONFIRMATION_DELAY, Conversation,
    REPLY_DELAY, SCHEDULER_DELAY, greeting,
};
pub use quick_actions::{QuickAction, canned_reply};
pub use session_controller::SessionController;
