use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::{distributions::Alphanumeric, Rng};
use secrecy::SecretString;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::db::models::{User, UserRole};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("email is already registered under a different role")]
    RoleConflict,

    #[error("email is already registered")]
    DuplicateEmail,
}

/// Result of looking up or provisioning a customer account.
///
/// `temp_password` is `Some` only when a brand-new account was created. The
/// credential is handed back exactly once; the scheduling core never stores
/// or logs it (`SecretString` redacts it from debug output).
#[derive(Debug)]
pub struct ProvisionedCustomer {
    pub user: User,
    pub temp_password: Option<SecretString>,
}

impl ProvisionedCustomer {
    pub fn is_new(&self) -> bool {
        self.temp_password.is_some()
    }
}

/// Contract of the external user directory. The scheduling core consumes it
/// for provider lookups and customer provisioning and trusts what it returns.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Option<User>;

    async fn find_by_email(&self, email: &str) -> Option<User>;

    /// Look up a customer by email, creating the account (with a temporary
    /// random credential) when none exists. Fails when the email belongs to
    /// an account of a different role.
    async fn find_or_create_customer(
        &self,
        email: &str,
        name: &str,
    ) -> Result<ProvisionedCustomer, DirectoryError>;

    /// Administrative account creation, used for seeding staff accounts.
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        role: UserRole,
    ) -> Result<User, DirectoryError>;
}

#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: DashMap<Uuid, User>,
    by_email: DashMap<String, Uuid>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn generate_temp_password() -> SecretString {
        let password: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(12)
            .map(char::from)
            .collect();
        SecretString::from(password)
    }

    fn make_user(email: &str, name: &str, role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_lowercase(),
            name: name.to_string(),
            role,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).map(|entry| entry.value().clone())
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        let id = self.by_email.get(&email.to_lowercase()).map(|e| *e.value())?;
        self.find_by_id(id).await
    }

    async fn find_or_create_customer(
        &self,
        email: &str,
        name: &str,
    ) -> Result<ProvisionedCustomer, DirectoryError> {
        let key = email.to_lowercase();
        // The entry guard keeps lookup and insert atomic for one email.
        match self.by_email.entry(key.clone()) {
            Entry::Occupied(entry) => {
                let user = self
                    .users
                    .get(entry.get())
                    .map(|e| e.value().clone())
                    .ok_or(DirectoryError::RoleConflict)?;
                if user.role != UserRole::Customer {
                    return Err(DirectoryError::RoleConflict);
                }
                Ok(ProvisionedCustomer {
                    user,
                    temp_password: None,
                })
            }
            Entry::Vacant(entry) => {
                let user = Self::make_user(&key, name, UserRole::Customer);
                entry.insert(user.id);
                self.users.insert(user.id, user.clone());
                info!(customer_id = %user.id, "provisioned new customer account");
                Ok(ProvisionedCustomer {
                    user,
                    temp_password: Some(Self::generate_temp_password()),
                })
            }
        }
    }

    async fn create_user(
        &self,
        email: &str,
        name: &str,
        role: UserRole,
    ) -> Result<User, DirectoryError> {
        let key = email.to_lowercase();
        match self.by_email.entry(key.clone()) {
            Entry::Occupied(_) => Err(DirectoryError::DuplicateEmail),
            Entry::Vacant(entry) => {
                let user = Self::make_user(&key, name, role);
                entry.insert(user.id);
                self.users.insert(user.id, user.clone());
                Ok(user)
            }
        }
    }
}
