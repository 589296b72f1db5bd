//! Appointment listing and maintenance for dashboards.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::{Appointment, AppointmentId, AuthContext, TimeSlot};
use crate::domain::errors::ClientError;
use crate::domain::ports::{AppointmentPort, RescheduleRequest};

/// Lists, reschedules and cancels appointments.
#[derive(Clone)]
pub struct ManageAppointmentsUseCase {
    appointments: Arc<dyn AppointmentPort>,
}

impl ManageAppointmentsUseCase {
    /// Use case over `appointments`.
    #[must_use]
    pub const fn new(appointments: Arc<dyn AppointmentPort>) -> Self {
        Self { appointments }
    }

    /// Lists appointments, earliest first.
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn list(&self, auth: &AuthContext) -> Result<Vec<Appointment>, ClientError> {
        let mut appointments = self
            .appointments
            .list(auth)
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to list appointments"))?;
        appointments.sort_by_key(Appointment::starts_at);
        debug!(count = appointments.len(), "Appointments loaded");
        Ok(appointments)
    }

    /// Fetches a single appointment.
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn get(
        &self,
        auth: &AuthContext,
        id: &AppointmentId,
    ) -> Result<Appointment, ClientError> {
        self.appointments
            .get(auth, id)
            .await
            .inspect_err(|e| warn!(appointment_id = %id, error = %e, "Failed to fetch appointment"))
    }

    /// Moves an appointment and returns its refreshed record.
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn reschedule(
        &self,
        auth: &AuthContext,
        id: &AppointmentId,
        request: &RescheduleRequest,
    ) -> Result<Appointment, ClientError> {
        self.appointments
            .reschedule(auth, id, request)
            .await
            .inspect_err(|e| warn!(appointment_id = %id, error = %e, "Reschedule failed"))?;
        info!(appointment_id = %id, date = %request.date, slot = %request.slot, "Appointment rescheduled");
        self.get(auth, id).await
    }

    /// Cancels an appointment.
    ///
    /// # Errors
    /// Returns the backend error.
    pub async fn cancel(&self, auth: &AuthContext, id: &AppointmentId) -> Result<(), ClientError> {
        self.appointments
            .cancel(auth, id)
            .await
            .inspect_err(|e| warn!(appointment_id = %id, error = %e, "Cancel failed"))?;
        info!(appointment_id = %id, "Appointment cancelled");
        Ok(())
    }

    /// Bookable slots, falling back to the standard table when the backend
    /// offers none or fails for a reason other than an expired session.
    ///
    /// # Errors
    /// Returns [`ClientError::Unauthorized`] so the session can be ended.
    pub async fn available_slots(&self, auth: &AuthContext) -> Result<Vec<TimeSlot>, ClientError> {
        match self.appointments.available_slots(auth).await {
            Ok(slots) if !slots.is_empty() => Ok(slots),
            Ok(_) => Ok(TimeSlot::standard()),
            Err(e) if e.is_unauthorized() => Err(e),
            Err(e) => {
                debug!(error = %e, "Slot lookup failed, using standard slots");
                Ok(TimeSlot::standard())
            }
        }
    }
}
