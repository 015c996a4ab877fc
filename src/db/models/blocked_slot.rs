use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Time};
use uuid::Uuid;
use validator::Validate;

use super::interval::TimeInterval;

/// A dentist-declared unavailable interval. Created by the owning dentist,
/// deletable only by the same dentist, never otherwise mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedSlot {
    pub id: Uuid,
    pub dentist_id: Uuid,
    #[serde(flatten)]
    pub interval: TimeInterval,
    pub reason: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBlockedSlot {
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub reason: Option<String>,
}
