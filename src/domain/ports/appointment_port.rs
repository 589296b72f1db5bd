//! Appointment backend port.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::domain::entities::{
    Appointment, AppointmentId, AuthContext, Department, IdentityDocument, SLOT_MINUTES, TimeSlot,
};
use crate::domain::errors::ClientError;

/// Reason sent when the patient leaves it blank.
pub const DEFAULT_REASON: &str = "Not specified";

/// Start and end of a booked slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    /// First minute of the slot.
    pub starts_at: DateTime<Utc>,
    /// Thirty minutes after the start.
    pub ends_at: DateTime<Utc>,
}

impl SlotWindow {
    /// Window for `slot` on `date`. Clinic wall-clock times are sent as UTC.
    #[must_use]
    pub fn on(date: NaiveDate, slot: TimeSlot) -> Self {
        let starts_at = date.and_time(slot.time()).and_utc();
        Self {
            starts_at,
            ends_at: starts_at + Duration::minutes(SLOT_MINUTES),
        }
    }
}

/// Validated booking.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct BookingRequest {
    pub patient_name: String,
    pub document: IdentityDocument,
    pub department: Department,
    pub date: NaiveDate,
    pub slot: TimeSlot,
    pub reason: String,
}

impl BookingRequest {
    /// Start and end sent for this booking.
    #[must_use]
    pub fn window(&self) -> SlotWindow {
        SlotWindow::on(self.date, self.slot)
    }

    /// Reason to send, substituting the default for blanks.
    #[must_use]
    pub fn effective_reason(&self) -> &str {
        let trimmed = self.reason.trim();
        if trimmed.is_empty() {
            DEFAULT_REASON
        } else {
            trimmed
        }
    }

    /// Human-readable summary used in chat notices.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} on {} at {}",
            self.department,
            self.date.format("%Y-%m-%d"),
            self.slot
        )
    }
}

/// Move of an existing appointment to a new slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescheduleRequest {
    /// Department to move to.
    pub department: Department,
    /// New day.
    pub date: NaiveDate,
    /// New slot on that day.
    pub slot: TimeSlot,
}

impl RescheduleRequest {
    /// Start and end to send.
    #[must_use]
    pub fn window(&self) -> SlotWindow {
        SlotWindow::on(self.date, self.slot)
    }
}

/// Port for the appointment backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentPort: Send + Sync {
    /// Lists appointments visible to the caller.
    async fn list(&self, auth: &AuthContext) -> Result<Vec<Appointment>, ClientError>;

    /// Fetches one appointment.
    async fn get(&self, auth: &AuthContext, id: &AppointmentId)
    -> Result<Appointment, ClientError>;

    /// Books an appointment and returns its id.
    async fn create(
        &self,
        auth: &AuthContext,
        request: &BookingRequest,
    ) -> Result<AppointmentId, ClientError>;

    /// Moves an appointment to another slot.
    async fn reschedule(
        &self,
        auth: &AuthContext,
        id: &AppointmentId,
        request: &RescheduleRequest,
    ) -> Result<(), ClientError>;

    /// Cancels an appointment.
    async fn cancel(&self, auth: &AuthContext, id: &AppointmentId) -> Result<(), ClientError>;

    /// Slots the backend currently offers.
    async fn available_slots(&self, auth: &AuthContext) -> Result<Vec<TimeSlot>, ClientError>;
}
