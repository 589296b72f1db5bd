//! Pure domain services.

mod account_validator;
mod booking_validator;

pub use account_validator::{AccountValidator, MIN_PASSWORD_LEN, RegistrationForm};
pub use booking_validator::{BookingForm, BookingValidator};
