//! Domain entity definitions.

mod appointment;
mod chat_message;
mod identity;
mod language;
mod principal;
mod role;
mod session;
mod token;

pub use appointment::{Appointment, AppointmentId, Department, SLOT_MINUTES, TimeSlot};
pub use chat_message::{ChatMessage, MessageKind, Sender, Transcript};
pub use identity::{IdentityDocument, IdentityType};
pub use language::{LANGUAGES, resolve_language};
pub use principal::Principal;
pub use role::Role;
pub use session::{AuthContext, Session};
pub use token::BearerToken;
