pub mod availability;
pub mod booking;
pub mod lifecycle;

pub use availability::Availability;
pub use booking::{BookingError, BookingService};
pub use lifecycle::LifecycleError;
