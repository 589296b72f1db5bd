//! Appointment entities and the static scheduling tables.

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::IdentityType;

/// Length of one booking slot.
pub const SLOT_MINUTES: i64 = 30;

/// Backend appointment identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(#[serde(with = "crate::domain::serde_utils::id_as_string")] String);

impl AppointmentId {
    /// Wraps a backend id.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Id as sent in URLs.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Clinic departments that accept bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Department {
    GeneralPractice,
    Pediatrics,
    Emergency,
    Cardiology,
    Dermatology,
    Orthopedics,
    Dental,
}

impl Department {
    /// Every department, in form order.
    pub const ALL: [Self; 7] = [
        Self::GeneralPractice,
        Self::Pediatrics,
        Self::Emergency,
        Self::Cardiology,
        Self::Dermatology,
        Self::Orthopedics,
        Self::Dental,
    ];

    /// Name sent as `clinician`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GeneralPractice => "General Practice",
            Self::Pediatrics => "Pediatrics",
            Self::Emergency => "Emergency",
            Self::Cardiology => "Cardiology",
            Self::Dermatology => "Dermatology",
            Self::Orthopedics => "Orthopedics",
            Self::Dental => "Dental",
        }
    }

    /// Case-insensitive lookup by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dept| dept.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Start time of a bookable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot(NaiveTime);

const SLOT_TIMES: [(u32, u32); 12] = [
    (9, 0),
    (9, 30),
    (10, 0),
    (10, 30),
    (11, 0),
    (11, 30),
    (14, 0),
    (14, 30),
    (15, 0),
    (15, 30),
    (16, 0),
    (16, 30),
];

impl TimeSlot {
    /// The clinic's standard slots, in order.
    #[must_use]
    pub fn standard() -> Vec<Self> {
        SLOT_TIMES
            .iter()
            .filter_map(|&(h, m)| NaiveTime::from_hms_opt(h, m, 0).map(Self))
            .collect()
    }

    /// Parses an `HH:MM` label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        NaiveTime::parse_from_str(label.trim(), "%H:%M").ok().map(Self)
    }

    /// Start time of the slot.
    #[must_use]
    pub const fn time(self) -> NaiveTime {
        self.0
    }

    /// Returns the `HH:MM` label.
    #[must_use]
    pub fn label(self) -> String {
        self.0.format("%H:%M").to_string()
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// A booked appointment as returned by the appointment backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(alias = "_id")]
    id: AppointmentId,
    #[serde(default)]
    patient_name: String,
    #[serde(default)]
    id_type: Option<IdentityType>,
    #[serde(default)]
    id_number: Option<String>,
    #[serde(default)]
    clinician: String,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    status: Option<String>,
}

impl Appointment {
    /// Creates an appointment record.
    #[must_use]
    pub fn new(
        id: AppointmentId,
        patient_name: impl Into<String>,
        clinician: impl Into<String>,
        starts_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            patient_name: patient_name.into(),
            id_type: None,
            id_number: None,
            clinician: clinician.into(),
            starts_at,
            ends_at: starts_at + Duration::minutes(SLOT_MINUTES),
            reason: String::new(),
            status: None,
        }
    }

    /// Sets the reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Backend id.
    #[must_use]
    pub const fn id(&self) -> &AppointmentId {
        &self.id
    }

    /// Name the booking was made under.
    #[must_use]
    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    /// Identity document type, when the backend returns it.
    #[must_use]
    pub const fn id_type(&self) -> Option<IdentityType> {
        self.id_type
    }

    /// Identity document number.
    #[must_use]
    pub fn id_number(&self) -> Option<&str> {
        self.id_number.as_deref()
    }

    /// Department name as stored by the backend.
    #[must_use]
    pub fn clinician(&self) -> &str {
        &self.clinician
    }

    /// Parsed department, when the backend used one of ours.
    #[must_use]
    pub fn department(&self) -> Option<Department> {
        Department::from_name(&self.clinician)
    }

    /// Start as sent by the backend.
    #[must_use]
    pub const fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    /// End as sent by the backend.
    #[must_use]
    pub const fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Start on the clinic's wall clock.
    ///
    /// Slots travel as wall-clock times labelled UTC, so this is the UTC
    /// reading with no conversion to the terminal's zone.
    #[must_use]
    pub fn clinic_start(&self) -> NaiveDateTime {
        self.starts_at.naive_utc()
    }

    /// Booked slot, if the start falls on the standard grid.
    #[must_use]
    pub fn slot(&self) -> Option<TimeSlot> {
        let time = self.clinic_start().time();
        TimeSlot::standard().into_iter().find(|slot| slot.time() == time)
    }

    /// Reason for the visit. Empty when the backend sent none.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Backend status, e.g. `confirmed`.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
