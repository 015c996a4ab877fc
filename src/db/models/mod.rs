mod appointment;
mod blocked_slot;
mod interval;
mod user;

pub use appointment::{Appointment, AppointmentStatus, NewAppointment, UpdateAppointmentPayload};
pub use blocked_slot::{BlockedSlot, NewBlockedSlot};
pub use interval::{DateRange, InvalidInterval, TimeInterval};
pub use user::{User, UserRole};
