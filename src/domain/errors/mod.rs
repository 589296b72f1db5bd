//! Domain error types.

mod client_error;
mod storage_error;
mod validation_error;

pub use client_error::{CONNECTIVITY_MESSAGE, ClientError, SESSION_EXPIRED_MESSAGE};
pub use storage_error::StorageError;
pub use validation_error::{FieldError, FormField, ValidationErrors};
