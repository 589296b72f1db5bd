//! Domain layer with core business entities, navigation rules and port definitions.

/// Backend availability.
pub mod connection;
/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Screens and the transition function.
pub mod navigation;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;
/// Form validation.
pub mod services;

pub use connection::BackendStatus;
pub use entities::{Principal, Role, Session};
pub use errors::{ClientError, StorageError};
pub use navigation::{NavEvent, PublicScreen, Screen, guard, transition};
pub use ports::{AppointmentPort, AuthPort, ChatPort, SessionStoragePort};
