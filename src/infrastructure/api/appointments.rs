use async_trait::async_trait;
use reqwest::Method;
use tracing::info;

use super::client::ApiClient;
use super::dto::{AppointmentBody, CreatedResponse, RescheduleBody, SlotsResponse};
use crate::domain::entities::{Appointment, AppointmentId, AuthContext, TimeSlot};
use crate::domain::errors::ClientError;
use crate::domain::ports::{AppointmentPort, BookingRequest, RescheduleRequest};

const APPOINTMENTS_PATH: &str = "/appointments";
const SLOTS_PATH: &str = "/appointments/slots";

fn item_path(id: &AppointmentId) -> String {
    format!("{APPOINTMENTS_PATH}/id/{id}")
}

#[async_trait]
impl AppointmentPort for ApiClient {
    async fn list(&self, auth: &AuthContext) -> Result<Vec<Appointment>, ClientError> {
        let request = self.request(Method::GET, APPOINTMENTS_PATH, auth);
        self.send_json(request, APPOINTMENTS_PATH).await
    }

    async fn get(
        &self,
        auth: &AuthContext,
        id: &AppointmentId,
    ) -> Result<Appointment, ClientError> {
        let path = item_path(id);
        let request = self.request(Method::GET, &path, auth);
        self.send_json(request, &path).await
    }

    async fn create(
        &self,
        auth: &AuthContext,
        request: &BookingRequest,
    ) -> Result<AppointmentId, ClientError> {
        let body = AppointmentBody::from(request);
        let builder = self.request_json(Method::POST, APPOINTMENTS_PATH, auth, &body);
        let created: CreatedResponse = self.send_json(builder, APPOINTMENTS_PATH).await?;

        let id = AppointmentId::new(created.into_id());
        info!(appointment_id = %id, clinician = %request.department, "Appointment created");
        Ok(id)
    }

    async fn reschedule(
        &self,
        auth: &AuthContext,
        id: &AppointmentId,
        request: &RescheduleRequest,
    ) -> Result<(), ClientError> {
        let path = item_path(id);
        let body = RescheduleBody::from(request);
        let builder = self.request_json(Method::PUT, &path, auth, &body);
        self.send(builder, &path).await?;
        info!(appointment_id = %id, "Appointment rescheduled");
        Ok(())
    }

    async fn cancel(&self, auth: &AuthContext, id: &AppointmentId) -> Result<(), ClientError> {
        let path = item_path(id);
        let request = self.request(Method::DELETE, &path, auth);
        self.send(request, &path).await?;
        info!(appointment_id = %id, "Appointment cancelled");
        Ok(())
    }

    async fn available_slots(&self, auth: &AuthContext) -> Result<Vec<TimeSlot>, ClientError> {
        let request = self.request(Method::GET, SLOTS_PATH, auth);
        let response: SlotsResponse = self.send_json(request, SLOTS_PATH).await?;
        Ok(response.into_slots())
    }
}
