mod appointment_port;
mod auth_port;
mod chat_port;
mod session_storage_port;

pub use appointment_port::{
    AppointmentPort, BookingRequest, DEFAULT_REASON, RescheduleRequest, SlotWindow,
};
pub use auth_port::{AuthPort, Credentials, RegistrationReceipt, RegistrationRequest};
pub use chat_port::ChatPort;
pub use session_storage_port::{
    CREDENTIAL_SLOT, PRINCIPAL_SLOT, SessionStoragePort, session_from_slots, session_to_slots,
};

/// Test doubles for every port.
#[cfg(test)]
pub mod mocks {
    pub use super::appointment_port::MockAppointmentPort;
    pub use super::auth_port::mock::MockAuthPort;
    pub use super::chat_port::MockChatPort;
    pub use super::session_storage_port::mock::MockSessionStorage;
}
