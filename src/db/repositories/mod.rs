pub mod slot_repository;
pub mod user_repository;

pub use slot_repository::SlotStore;
pub use user_repository::{
    DirectoryError, InMemoryUserDirectory, ProvisionedCustomer, UserDirectory,
};
