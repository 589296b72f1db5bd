//! Application layer with use cases, DTOs and the session controller.

/// Data transfer objects.
pub mod dto;
/// Conversation state, quick actions and the view/session controller.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{LoginRequest, LoginResponse, RegisterResponse, SessionSource};
pub use services::{Conversation, QuickAction, SessionController};
pub use use_cases::{
    BookAppointmentUseCase, ChatUseCase, LoginUseCase, ManageAppointmentsUseCase,
    RegisterUseCase, RestoreSessionUseCase,
};
