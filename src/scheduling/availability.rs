use serde::Serialize;
use uuid::Uuid;

use crate::db::models::{Appointment, BlockedSlot, DateRange};
use crate::db::repositories::SlotStore;

/// Busy view for one dentist: blocked slots plus live appointments,
/// deliberately un-merged. Consumers render free/busy grids by subtracting
/// both collections from the working day themselves.
#[derive(Debug, Clone, Serialize)]
pub struct Availability {
    pub blocked_slots: Vec<BlockedSlot>,
    pub appointments: Vec<Appointment>,
}

/// Read-only projection over the store. Cancelled appointments are excluded;
/// they no longer occupy their interval.
pub async fn resolve(store: &SlotStore, dentist_id: Uuid, range: &DateRange) -> Availability {
    Availability {
        blocked_slots: store.list_blocked(dentist_id, range).await,
        appointments: store.list_appointments(dentist_id, range, true).await,
    }
}
