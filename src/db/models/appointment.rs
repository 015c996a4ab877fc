use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Time};
use uuid::Uuid;
use validator::Validate;

use super::interval::TimeInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Terminal states admit no outward transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub dentist_id: Uuid,
    pub customer_id: Uuid,
    #[serde(flatten)]
    pub interval: TimeInterval,
    pub reason: String,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Public booking payload. The customer is looked up by email and provisioned
/// on the fly when unknown.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAppointment {
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(min = 1))]
    pub customer_name: String,
    pub dentist_id: Uuid,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    #[validate(length(min = 1))]
    pub reason: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAppointmentPayload {
    pub status: Option<AppointmentStatus>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}
