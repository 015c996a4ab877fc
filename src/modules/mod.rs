pub mod appointments;
pub mod dentists;
