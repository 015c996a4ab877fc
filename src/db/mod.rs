mod error;
pub mod models;
pub mod repositories;

pub use error::StoreError;
