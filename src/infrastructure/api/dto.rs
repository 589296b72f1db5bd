//! Wire types for the VitalAI backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Appointment, IdentityType, Principal, Role, TimeSlot};
use crate::domain::ports::{BookingRequest, RegistrationRequest, RescheduleRequest};

/// FastAPI error body.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, deserialize_with = "crate::domain::serde_utils::detail_message::deserialize")]
    pub detail: Option<String>,
}

/// `POST /auth/login` body.
#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
}

/// Successful login.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: Principal,
}

/// `POST /auth/register` body.
#[derive(Serialize)]
pub struct RegisterBody<'a> {
    pub identifier: &'a str,
    pub identifier_type: IdentityType,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub password: &'a str,
    pub role: Role,
    pub language: &'a str,
}

impl<'a> From<&'a RegistrationRequest> for RegisterBody<'a> {
    fn from(request: &'a RegistrationRequest) -> Self {
        Self {
            identifier: &request.identifier,
            identifier_type: request.identifier_type,
            first_name: &request.first_name,
            last_name: &request.last_name,
            phone: &request.phone,
            password: &request.password,
            role: request.role,
            language: &request.language,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<Principal>,
}

impl RegisterResponse {
    /// Account id as text, whether the backend sends a number or a string.
    pub fn user_id(&self) -> Option<String> {
        match self.user_id.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatBody<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct AppointmentBody<'a> {
    pub patient_name: &'a str,
    pub id_type: IdentityType,
    pub id_number: &'a str,
    pub clinician: &'a str,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub reason: &'a str,
}

impl<'a> From<&'a BookingRequest> for AppointmentBody<'a> {
    fn from(request: &'a BookingRequest) -> Self {
        let window = request.window();
        Self {
            patient_name: &request.patient_name,
            id_type: request.document.kind(),
            id_number: request.document.number(),
            clinician: request.department.name(),
            starts_at: window.starts_at,
            ends_at: window.ends_at,
            reason: request.effective_reason(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RescheduleBody<'a> {
    pub clinician: &'a str,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl From<&RescheduleRequest> for RescheduleBody<'static> {
    fn from(request: &RescheduleRequest) -> Self {
        let window = request.window();
        Self {
            clinician: request.department.name(),
            starts_at: window.starts_at,
            ends_at: window.ends_at,
        }
    }
}

/// Response to a create call: either the stored appointment or just its id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CreatedResponse {
    Appointment(Appointment),
    Id {
        #[serde(
            alias = "_id",
            alias = "appointment_id",
            with = "crate::domain::serde_utils::id_as_string"
        )]
        id: String,
    },
}

impl CreatedResponse {
    /// Id of the created appointment.
    pub fn into_id(self) -> String {
        match self {
            Self::Appointment(appointment) => appointment.id().as_str().to_string(),
            Self::Id { id } => id,
        }
    }
}

/// Slot listing: a bare array or wrapped in `slots`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SlotsResponse {
    Bare(Vec<String>),
    Wrapped { slots: Vec<String> },
}

impl SlotsResponse {
    /// Parsed slots in time order. Unparseable labels are dropped.
    pub fn into_slots(self) -> Vec<TimeSlot> {
        let labels = match self {
            Self::Bare(labels) | Self::Wrapped { slots: labels } => labels,
        };
        let mut slots: Vec<TimeSlot> = labels.iter().filter_map(|l| TimeSlot::parse(l)).collect();
        slots.sort();
        slots.dedup();
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Department, IdentityDocument};
    use chrono::NaiveDate;

    #[test]
    fn test_parse_token_response() {
        let json = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "user": {
                "id": 3,
                "identifier": "8001015009087",
                "identifier_type": "id",
                "first_name": "Thandi",
                "last_name": "Mokoena",
                "phone": null,
                "email": null,
                "role": "patient",
                "language": "English"
            }
        }"#;

        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "jwt");
        assert_eq!(response.user.role(), Role::Patient);
        assert_eq!(response.user.phone(), "");
    }

    #[test]
    fn test_register_user_id_shapes() {
        let numeric: RegisterResponse =
            serde_json::from_str(r#"{"message": "User registered successfully", "user_id": 7}"#)
                .unwrap();
        assert_eq!(numeric.user_id(), Some("7".to_string()));

        let text: RegisterResponse = serde_json::from_str(r#"{"user_id": "abc"}"#).unwrap();
        assert_eq!(text.user_id(), Some("abc".to_string()));
        assert!(text.message.is_none());
    }

    #[test]
    fn test_appointment_body() {
        let request = BookingRequest {
            patient_name: "Thandi Mokoena".to_string(),
            document: IdentityDocument::new(IdentityType::Passport, "A1234567").unwrap(),
            department: Department::Dental,
            date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            slot: TimeSlot::parse("14:30").unwrap(),
            reason: String::new(),
        };

        let value = serde_json::to_value(AppointmentBody::from(&request)).unwrap();
        assert_eq!(value["id_type"], "passport");
        assert_eq!(value["clinician"], "Dental");
        assert_eq!(value["starts_at"], "2026-11-02T14:30:00Z");
        assert_eq!(value["ends_at"], "2026-11-02T15:00:00Z");
        assert_eq!(value["reason"], "Not specified");
    }

    #[test]
    fn test_created_response_shapes() {
        let id_only: CreatedResponse = serde_json::from_str(r#"{"id": 41}"#).unwrap();
        assert_eq!(id_only.into_id(), "41");

        let mongo: CreatedResponse = serde_json::from_str(r#"{"_id": "a1b2"}"#).unwrap();
        assert_eq!(mongo.into_id(), "a1b2");

        let full: CreatedResponse = serde_json::from_str(
            r#"{"id": 9, "clinician": "Dental",
                "starts_at": "2026-11-02T14:30:00Z", "ends_at": "2026-11-02T15:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(full.into_id(), "9");
    }

    #[test]
    fn test_slots_response_shapes() {
        let bare: SlotsResponse = serde_json::from_str(r#"["14:00", "09:30", "bad"]"#).unwrap();
        let labels: Vec<String> = bare.into_slots().into_iter().map(TimeSlot::label).collect();
        assert_eq!(labels, vec!["09:30", "14:00"]);

        let wrapped: SlotsResponse = serde_json::from_str(r#"{"slots": ["10:00"]}"#).unwrap();
        assert_eq!(wrapped.into_slots().len(), 1);
    }
}
