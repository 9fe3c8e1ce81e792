use chrono::NaiveDate;
use serde_json::json;

use super::ApiClient;
use crate::errors::ApiError;
use crate::models::{Appointment, AppointmentStatus, Id, NewAppointment};

impl ApiClient {
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.get_list("/appointments/appointments/").await
    }

    /// Book an appointment. `today` anchors the "not in the past" check.
    pub async fn book_appointment(
        &self,
        appointment: &NewAppointment,
        today: NaiveDate,
    ) -> Result<Appointment, ApiError> {
        appointment.validate(today)?;
        self.post_json("/appointments/appointments/", appointment)
            .await
    }

    pub async fn set_appointment_status(
        &self,
        id: Id,
        status: AppointmentStatus,
    ) -> Result<Appointment, ApiError> {
        self.patch_json(
            &format!("/appointments/appointments/{}/", id),
            &json!({ "status": status }),
        )
        .await
    }
}
