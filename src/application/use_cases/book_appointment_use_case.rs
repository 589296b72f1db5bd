//! Appointment booking use case.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::entities::{AppointmentId, AuthContext};
use crate::domain::errors::ClientError;
use crate::domain::ports::{AppointmentPort, BookingRequest};
use crate::domain::services::{BookingForm, BookingValidator};

/// A booking accepted by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    /// Backend id of the new appointment.
    pub id: AppointmentId,
    /// What was booked.
    pub request: BookingRequest,
}

impl BookingConfirmation {
    /// Transcript line announcing the booking.
    #[must_use]
    pub fn notice(&self) -> String {
        format!("Appointment scheduled: {}", self.request.summary())
    }
}

/// Validates and submits appointment bookings.
#[derive(Clone)]
pub struct BookAppointmentUseCase {
    appointments: Arc<dyn AppointmentPort>,
}

impl BookAppointmentUseCase {
    /// Creates new booking use case.
    #[must_use]
    pub const fn new(appointments: Arc<dyn AppointmentPort>) -> Self {
        Self { appointments }
    }

    /// Validates `form` against `today` and books it.
    ///
    /// # Errors
    /// Returns [`ClientError::Validation`] without contacting the backend
    /// when a field is missing or malformed, otherwise the backend error.
    pub async fn execute(
        &self,
        auth: &AuthContext,
        form: &BookingForm,
        today: NaiveDate,
    ) -> Result<BookingConfirmation, ClientError> {
        let request = BookingValidator::validate(form, today).inspect_err(|errors| {
            debug!(%errors, "Booking form rejected");
        })?;

        debug!(
            department = %request.department,
            date = %request.date,
            slot = %request.slot,
            guest = auth.is_guest(),
            "Submitting booking"
        );

        let id = self
            .appointments
            .create(auth, &request)
            .await
            .inspect_err(|e| warn!(error = %e, "Booking failed"))?;

        info!(appointment_id = %id, "Appointment booked");
        Ok(BookingConfirmation { id, request })
    }
}
