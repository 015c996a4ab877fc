use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::models::{
    Appointment, AppointmentStatus, BlockedSlot, DateRange, InvalidInterval, NewAppointment,
    NewBlockedSlot, TimeInterval, UpdateAppointmentPayload, UserRole,
};
use crate::db::repositories::{SlotStore, UserDirectory};
use crate::db::StoreError;

use super::availability::{self, Availability};
use super::lifecycle::{self, LifecycleError};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("dentist not found")]
    UnknownDentist,

    #[error("user {0} does not have the dentist role")]
    InvalidDentist(Uuid),

    #[error("only dentists can block time slots")]
    NotADentist(Uuid),

    #[error("email is already registered under a different role")]
    RoleConflict,

    #[error("slot unavailable: {0}")]
    SlotUnavailable(StoreError),

    #[error("appointment or blocked slot not found")]
    NotFound,

    #[error("blocked slot belongs to another dentist")]
    Forbidden,

    #[error(transparent)]
    InvalidInterval(#[from] InvalidInterval),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SlotBooked | StoreError::SlotBlocked => BookingError::SlotUnavailable(err),
            StoreError::NotFound => BookingError::NotFound,
            StoreError::Forbidden => BookingError::Forbidden,
        }
    }
}

/// Validates and commits bookings and blocked slots against the slot store.
/// Holds explicitly passed handles to the store and the user directory; one
/// instance serves the whole application.
pub struct BookingService {
    store: Arc<SlotStore>,
    directory: Arc<dyn UserDirectory>,
}

impl BookingService {
    pub fn new(store: Arc<SlotStore>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { store, directory }
    }

    /// Book a new appointment. The dentist must exist with the dentist role;
    /// the customer is looked up by email or provisioned on the fly (a
    /// documented side effect: the directory issues a temporary credential
    /// for brand-new accounts). New appointments start out `Pending`.
    pub async fn create_appointment(
        &self,
        request: NewAppointment,
    ) -> Result<Appointment, BookingError> {
        let dentist = self
            .directory
            .find_by_id(request.dentist_id)
            .await
            .ok_or(BookingError::UnknownDentist)?;
        if dentist.role != UserRole::Dentist {
            return Err(BookingError::InvalidDentist(dentist.id));
        }

        let customer = self
            .directory
            .find_or_create_customer(&request.customer_email, &request.customer_name)
            .await
            .map_err(|_| BookingError::RoleConflict)?;
        if customer.is_new() {
            info!(
                customer_id = %customer.user.id,
                "new customer account provisioned during booking"
            );
        }

        let interval = TimeInterval::new(request.date, request.start_time, request.end_time)?;
        let now = OffsetDateTime::now_utc();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            dentist_id: dentist.id,
            customer_id: customer.user.id,
            interval,
            reason: request.reason,
            notes: request.notes,
            status: AppointmentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let appointment = self.store.insert_appointment(appointment).await.map_err(
            |err| {
                warn!(dentist_id = %dentist.id, %err, "booking rejected");
                BookingError::from(err)
            },
        )?;
        info!(
            appointment_id = %appointment.id,
            dentist_id = %appointment.dentist_id,
            "appointment booked"
        );
        Ok(appointment)
    }

    /// Reserve a personal/unavailable interval for a dentist. Blocking is
    /// refused outright when a live appointment already claims the interval.
    pub async fn block_slot(
        &self,
        dentist_id: Uuid,
        request: NewBlockedSlot,
    ) -> Result<BlockedSlot, BookingError> {
        let dentist = self
            .directory
            .find_by_id(dentist_id)
            .await
            .ok_or(BookingError::UnknownDentist)?;
        if dentist.role != UserRole::Dentist {
            return Err(BookingError::NotADentist(dentist_id));
        }

        let interval = TimeInterval::new(request.date, request.start_time, request.end_time)?;
        let slot = BlockedSlot {
            id: Uuid::new_v4(),
            dentist_id,
            interval,
            reason: request.reason,
            created_at: OffsetDateTime::now_utc(),
        };

        let slot = self.store.insert_blocked(slot).await?;
        info!(slot_id = %slot.id, %dentist_id, "time slot blocked");
        Ok(slot)
    }

    /// Remove a blocked slot; only its owner may do so.
    pub async fn unblock_slot(
        &self,
        slot_id: Uuid,
        requesting_dentist: Uuid,
    ) -> Result<(), BookingError> {
        self.store.remove_blocked(slot_id, requesting_dentist).await?;
        info!(%slot_id, dentist_id = %requesting_dentist, "time slot unblocked");
        Ok(())
    }

    /// Busy view for a dentist over an optional date range.
    pub async fn availability(&self, dentist_id: Uuid, range: DateRange) -> Availability {
        availability::resolve(&self.store, dentist_id, &range).await
    }

    pub async fn blocked_slots(&self, dentist_id: Uuid, range: DateRange) -> Vec<BlockedSlot> {
        self.store.list_blocked(dentist_id, &range).await
    }

    pub async fn appointment(&self, id: Uuid) -> Result<Appointment, BookingError> {
        Ok(self.store.get_appointment(id).await?)
    }

    /// Apply a lifecycle update. The transition check runs under the same
    /// write lock as the mutation, so a concurrent cancellation cannot be
    /// overwritten by a stale confirm.
    pub async fn update_appointment(
        &self,
        id: Uuid,
        payload: UpdateAppointmentPayload,
        actor: UserRole,
    ) -> Result<Appointment, BookingError> {
        let requested = payload.status;
        let outcome = self
            .store
            .update_appointment(id, |appointment| {
                lifecycle::check_transition(appointment.status, requested, actor)?;
                if let Some(status) = requested {
                    appointment.status = status;
                }
                if let Some(reason) = payload.reason.clone() {
                    appointment.reason = reason;
                }
                if let Some(notes) = payload.notes.clone() {
                    appointment.notes = Some(notes);
                }
                Ok(())
            })
            .await?;

        let updated = outcome.map_err(BookingError::Lifecycle)?;
        if updated.status == AppointmentStatus::Cancelled {
            info!(appointment_id = %id, "appointment cancelled; interval freed");
        }
        Ok(updated)
    }

    /// Administrative hard delete, not part of the standard flow.
    pub async fn delete_appointment(&self, id: Uuid) -> Result<(), BookingError> {
        self.store.remove_appointment(id).await?;
        warn!(appointment_id = %id, "appointment hard-deleted");
        Ok(())
    }

    pub async fn dentist_appointments(&self, dentist_id: Uuid) -> Vec<Appointment> {
        self.store.appointments_for_dentist(dentist_id).await
    }

    pub async fn customer_appointments(&self, customer_id: Uuid) -> Vec<Appointment> {
        self.store.appointments_for_customer(customer_id).await
    }

    pub async fn all_appointments(&self) -> Vec<Appointment> {
        self.store.all_appointments().await
    }
}
