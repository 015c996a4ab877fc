use std::sync::Arc;

use dashmap::DashMap;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::db::models::{Appointment, AppointmentStatus, BlockedSlot, DateRange};
use crate::db::StoreError;

#[derive(Debug, Default)]
struct DentistSlots {
    blocked: Vec<BlockedSlot>,
    appointments: Vec<Appointment>,
}

/// Authoritative per-dentist collections of blocked slots and appointments.
///
/// Each dentist's state sits behind its own `RwLock`, so the overlap check
/// and the commit of a new slot happen under a single write lock: two racing
/// requests for the same dentist serialize, and the loser observes the
/// winner's slot. Readers take read locks and may run concurrently; a read
/// that races a write sees a view at most one write stale.
///
/// Invariant: for any dentist, no two members of
/// `{blocked} ∪ {appointments with status != Cancelled}` overlap, under the
/// inclusive boundary rule of `TimeInterval::overlaps`.
#[derive(Debug, Default)]
pub struct SlotStore {
    dentists: DashMap<Uuid, Arc<RwLock<DentistSlots>>>,
    // id -> dentist id, so cross-dentist lookups stay O(1)
    blocked_index: DashMap<Uuid, Uuid>,
    appointment_index: DashMap<Uuid, Uuid>,
}

impl SlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn dentist_state(&self, dentist_id: Uuid) -> Arc<RwLock<DentistSlots>> {
        self.dentists.entry(dentist_id).or_default().clone()
    }

    /// Commit a new appointment unless its interval collides with a blocked
    /// slot or a non-cancelled appointment of the same dentist. A rejection
    /// leaves the store untouched.
    pub async fn insert_appointment(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, StoreError> {
        let state = self.dentist_state(appointment.dentist_id);
        let mut slots = state.write().await;

        if let Some(existing) = slots
            .appointments
            .iter()
            .filter(|a| a.status != AppointmentStatus::Cancelled)
            .find(|a| a.interval.overlaps(&appointment.interval))
        {
            debug!(
                dentist_id = %appointment.dentist_id,
                conflicting = %existing.id,
                "appointment rejected: interval already booked"
            );
            return Err(StoreError::SlotBooked);
        }
        if let Some(existing) = slots
            .blocked
            .iter()
            .find(|b| b.interval.overlaps(&appointment.interval))
        {
            debug!(
                dentist_id = %appointment.dentist_id,
                conflicting = %existing.id,
                "appointment rejected: interval is blocked"
            );
            return Err(StoreError::SlotBlocked);
        }

        self.appointment_index
            .insert(appointment.id, appointment.dentist_id);
        let position = slots.appointments.partition_point(|a| {
            (a.interval.date, a.interval.start_time)
                <= (appointment.interval.date, appointment.interval.start_time)
        });
        slots.appointments.insert(position, appointment.clone());
        Ok(appointment)
    }

    /// Commit a new blocked slot. Blocking is refused, never forced, when a
    /// live appointment or another blocked slot already claims the interval.
    pub async fn insert_blocked(&self, slot: BlockedSlot) -> Result<BlockedSlot, StoreError> {
        let state = self.dentist_state(slot.dentist_id);
        let mut slots = state.write().await;

        if slots
            .appointments
            .iter()
            .filter(|a| a.status != AppointmentStatus::Cancelled)
            .any(|a| a.interval.overlaps(&slot.interval))
        {
            debug!(dentist_id = %slot.dentist_id, "block rejected: interval already booked");
            return Err(StoreError::SlotBooked);
        }
        if slots.blocked.iter().any(|b| b.interval.overlaps(&slot.interval)) {
            debug!(dentist_id = %slot.dentist_id, "block rejected: interval already blocked");
            return Err(StoreError::SlotBlocked);
        }

        self.blocked_index.insert(slot.id, slot.dentist_id);
        let position = slots.blocked.partition_point(|b| {
            (b.interval.date, b.interval.start_time) <= (slot.interval.date, slot.interval.start_time)
        });
        slots.blocked.insert(position, slot.clone());
        Ok(slot)
    }

    /// Delete a blocked slot. Only the dentist who created it may remove it.
    pub async fn remove_blocked(
        &self,
        slot_id: Uuid,
        requesting_dentist: Uuid,
    ) -> Result<(), StoreError> {
        let dentist_id = self
            .blocked_index
            .get(&slot_id)
            .map(|entry| *entry.value())
            .ok_or(StoreError::NotFound)?;

        let state = self.dentist_state(dentist_id);
        let mut slots = state.write().await;
        let position = slots
            .blocked
            .iter()
            .position(|b| b.id == slot_id)
            .ok_or(StoreError::NotFound)?;
        if slots.blocked[position].dentist_id != requesting_dentist {
            return Err(StoreError::Forbidden);
        }
        slots.blocked.remove(position);
        self.blocked_index.remove(&slot_id);
        Ok(())
    }

    /// Blocked slots for a dentist within `range`, sorted by date then start
    /// time ascending.
    pub async fn list_blocked(&self, dentist_id: Uuid, range: &DateRange) -> Vec<BlockedSlot> {
        let state = self.dentist_state(dentist_id);
        let slots = state.read().await;
        slots
            .blocked
            .iter()
            .filter(|b| range.contains(b.interval.date))
            .cloned()
            .collect()
    }

    /// Appointments for a dentist within `range`, same ordering as
    /// `list_blocked`.
    pub async fn list_appointments(
        &self,
        dentist_id: Uuid,
        range: &DateRange,
        exclude_cancelled: bool,
    ) -> Vec<Appointment> {
        let state = self.dentist_state(dentist_id);
        let slots = state.read().await;
        slots
            .appointments
            .iter()
            .filter(|a| range.contains(a.interval.date))
            .filter(|a| !exclude_cancelled || a.status != AppointmentStatus::Cancelled)
            .cloned()
            .collect()
    }

    pub async fn get_appointment(&self, id: Uuid) -> Result<Appointment, StoreError> {
        let dentist_id = self
            .appointment_index
            .get(&id)
            .map(|entry| *entry.value())
            .ok_or(StoreError::NotFound)?;
        let state = self.dentist_state(dentist_id);
        let slots = state.read().await;
        slots
            .appointments
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    /// Mutate an appointment under its dentist's write lock. The closure may
    /// reject the update; a rejection leaves the record untouched.
    pub async fn update_appointment<F, E>(
        &self,
        id: Uuid,
        apply: F,
    ) -> Result<Result<Appointment, E>, StoreError>
    where
        F: FnOnce(&mut Appointment) -> Result<(), E>,
    {
        let dentist_id = self
            .appointment_index
            .get(&id)
            .map(|entry| *entry.value())
            .ok_or(StoreError::NotFound)?;
        let state = self.dentist_state(dentist_id);
        let mut slots = state.write().await;
        let appointment = slots
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound)?;

        match apply(appointment) {
            Ok(()) => {
                appointment.updated_at = OffsetDateTime::now_utc();
                Ok(Ok(appointment.clone()))
            }
            Err(err) => Ok(Err(err)),
        }
    }

    /// Hard delete, administrative override only.
    pub async fn remove_appointment(&self, id: Uuid) -> Result<(), StoreError> {
        let dentist_id = self
            .appointment_index
            .get(&id)
            .map(|entry| *entry.value())
            .ok_or(StoreError::NotFound)?;
        let state = self.dentist_state(dentist_id);
        let mut slots = state.write().await;
        let position = slots
            .appointments
            .iter()
            .position(|a| a.id == id)
            .ok_or(StoreError::NotFound)?;
        slots.appointments.remove(position);
        self.appointment_index.remove(&id);
        Ok(())
    }

    /// All appointments for a dentist, cancelled included, newest first.
    pub async fn appointments_for_dentist(&self, dentist_id: Uuid) -> Vec<Appointment> {
        let state = self.dentist_state(dentist_id);
        let slots = state.read().await;
        let mut appointments: Vec<Appointment> = slots.appointments.iter().cloned().collect();
        sort_newest_first(&mut appointments);
        appointments
    }

    /// All appointments booked by one customer, across dentists, newest first.
    pub async fn appointments_for_customer(&self, customer_id: Uuid) -> Vec<Appointment> {
        let mut appointments = Vec::new();
        for state in self.all_dentist_states() {
            let slots = state.read().await;
            appointments.extend(
                slots
                    .appointments
                    .iter()
                    .filter(|a| a.customer_id == customer_id)
                    .cloned(),
            );
        }
        sort_newest_first(&mut appointments);
        appointments
    }

    /// Every appointment in the store, newest first (front-desk view).
    pub async fn all_appointments(&self) -> Vec<Appointment> {
        let mut appointments = Vec::new();
        for state in self.all_dentist_states() {
            let slots = state.read().await;
            appointments.extend(slots.appointments.iter().cloned());
        }
        sort_newest_first(&mut appointments);
        appointments
    }

    // Snapshot the Arc handles first so no DashMap shard guard is held
    // across an await point.
    fn all_dentist_states(&self) -> Vec<Arc<RwLock<DentistSlots>>> {
        self.dentists.iter().map(|entry| entry.value().clone()).collect()
    }
}

fn sort_newest_first(appointments: &mut [Appointment]) {
    appointments.sort_by(|a, b| {
        (b.interval.date, b.interval.start_time).cmp(&(a.interval.date, a.interval.start_time))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::TimeInterval;
    use time::macros::{date, time};

    fn appointment(dentist_id: Uuid, interval: TimeInterval) -> Appointment {
        let now = OffsetDateTime::now_utc();
        Appointment {
            id: Uuid::new_v4(),
            dentist_id,
            customer_id: Uuid::new_v4(),
            interval,
            reason: "checkup".to_string(),
            notes: None,
            status: AppointmentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    fn blocked(dentist_id: Uuid, interval: TimeInterval) -> BlockedSlot {
        BlockedSlot {
            id: Uuid::new_v4(),
            dentist_id,
            interval,
            reason: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn interval(start: time::Time, end: time::Time) -> TimeInterval {
        TimeInterval::new(date!(2024 - 06 - 01), start, end).unwrap()
    }

    #[tokio::test]
    async fn overlapping_appointment_is_rejected() {
        let store = SlotStore::new();
        let dentist = Uuid::new_v4();
        store
            .insert_appointment(appointment(dentist, interval(time!(10:00), time!(10:30))))
            .await
            .unwrap();

        let err = store
            .insert_appointment(appointment(dentist, interval(time!(10:15), time!(10:45))))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::SlotBooked);
    }

    #[tokio::test]
    async fn rejection_leaves_store_unchanged() {
        let store = SlotStore::new();
        let dentist = Uuid::new_v4();
        store
            .insert_appointment(appointment(dentist, interval(time!(10:00), time!(10:30))))
            .await
            .unwrap();

        let before = store
            .list_appointments(dentist, &DateRange::default(), false)
            .await;
        let _ = store
            .insert_appointment(appointment(dentist, interval(time!(10:00), time!(10:30))))
            .await;
        let after = store
            .list_appointments(dentist, &DateRange::default(), false)
            .await;
        assert_eq!(before.len(), after.len());
    }

    #[tokio::test]
    async fn cancelled_appointments_do_not_block() {
        let store = SlotStore::new();
        let dentist = Uuid::new_v4();
        let booked = store
            .insert_appointment(appointment(dentist, interval(time!(10:00), time!(10:30))))
            .await
            .unwrap();

        store
            .update_appointment(booked.id, |a| {
                a.status = AppointmentStatus::Cancelled;
                Ok::<(), StoreError>(())
            })
            .await
            .unwrap()
            .unwrap();

        store
            .insert_appointment(appointment(dentist, interval(time!(10:00), time!(10:30))))
            .await
            .expect("cancelled appointment should free the interval");
    }

    #[tokio::test]
    async fn blocking_over_appointment_is_refused() {
        let store = SlotStore::new();
        let dentist = Uuid::new_v4();
        store
            .insert_appointment(appointment(dentist, interval(time!(09:15), time!(09:45))))
            .await
            .unwrap();

        let err = store
            .insert_blocked(blocked(dentist, interval(time!(09:00), time!(09:30))))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::SlotBooked);
    }

    #[tokio::test]
    async fn booking_over_blocked_slot_is_refused() {
        let store = SlotStore::new();
        let dentist = Uuid::new_v4();
        store
            .insert_blocked(blocked(dentist, interval(time!(09:00), time!(09:30))))
            .await
            .unwrap();

        let err = store
            .insert_appointment(appointment(dentist, interval(time!(09:30), time!(10:00))))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::SlotBlocked);
    }

    #[tokio::test]
    async fn different_dentists_do_not_conflict() {
        let store = SlotStore::new();
        store
            .insert_appointment(appointment(Uuid::new_v4(), interval(time!(10:00), time!(10:30))))
            .await
            .unwrap();
        store
            .insert_appointment(appointment(Uuid::new_v4(), interval(time!(10:00), time!(10:30))))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unblock_is_owner_only() {
        let store = SlotStore::new();
        let owner = Uuid::new_v4();
        let slot = store
            .insert_blocked(blocked(owner, interval(time!(09:00), time!(09:30))))
            .await
            .unwrap();

        let err = store
            .remove_blocked(slot.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Forbidden);

        store.remove_blocked(slot.id, owner).await.unwrap();
        assert_eq!(
            store.remove_blocked(slot.id, owner).await.unwrap_err(),
            StoreError::NotFound
        );
    }

    #[tokio::test]
    async fn listings_are_sorted_by_date_then_start() {
        let store = SlotStore::new();
        let dentist = Uuid::new_v4();
        let later = TimeInterval::new(date!(2024 - 06 - 02), time!(09:00), time!(09:30)).unwrap();
        let earlier = interval(time!(11:00), time!(11:30));
        let earliest = interval(time!(08:00), time!(08:30));

        for iv in [later, earlier, earliest] {
            store.insert_appointment(appointment(dentist, iv)).await.unwrap();
        }

        let listed = store
            .list_appointments(dentist, &DateRange::default(), false)
            .await;
        let order: Vec<_> = listed
            .iter()
            .map(|a| (a.interval.date, a.interval.start_time))
            .collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);

        let newest_first = store.appointments_for_dentist(dentist).await;
        assert_eq!(newest_first.first().unwrap().interval.date, date!(2024 - 06 - 02));
    }
}
