use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    MainDoctor,
    Dentist,
    Receptionist,
    Customer,
}

impl UserRole {
    /// Staff roles allowed to move an appointment through its lifecycle.
    pub fn can_manage_appointments(self) -> bool {
        matches!(self, Self::MainDoctor | Self::Dentist | Self::Receptionist)
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MAIN_DOCTOR" => Ok(UserRole::MainDoctor),
            "DENTIST" => Ok(UserRole::Dentist),
            "RECEPTIONIST" => Ok(UserRole::Receptionist),
            "CUSTOMER" => Ok(UserRole::Customer),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Account record owned by the user directory. The scheduling core only reads
/// the id and role; everything else belongs to the directory collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: OffsetDateTime,
}
