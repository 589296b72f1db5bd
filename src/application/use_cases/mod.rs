//! Use case implementations.

mod book_appointment_use_case;
mod chat_use_case;
mod login_use_case;
mod manage_appointments_use_case;
mod register_use_case;
mod restore_session_use_case;

pub use book_appointment_use_case::{BookAppointmentUseCase, BookingConfirmation};
pub use chat_use_case::{ChatReply, ChatUseCase};
pub use login_use_case::LoginUseCase;
pub use manage_appointments_use_case::ManageAppointmentsUseCase;
pub use register_use_case::RegisterUseCase;
pub use restore_session_use_case::{RestoreSessionUseCase, RestoredSession};
