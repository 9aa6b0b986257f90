//! In-memory attendee store. A stand-in for a real database: contents are
//! lost on restart, which is acceptable for the mock registration flow.

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::{errors::ServiceError, models::User};

#[derive(Default)]
pub struct UserStore {
    /// Keyed by lower-cased email.
    users: DashMap<String, User>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.users.get(&email.to_ascii_lowercase()).map(|u| u.clone())
    }

    pub fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
    ) -> Result<User, ServiceError> {
        let key = email.to_ascii_lowercase();
        if self.users.contains_key(&key) {
            return Err(ServiceError::Conflict(format!(
                "account already exists for {email}"
            )));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(key, user.clone());
        Ok(user)
    }

    pub fn update_name(&self, email: &str, name: String) -> Result<User, ServiceError> {
        let key = email.to_ascii_lowercase();
        let mut entry = self
            .users
            .get_mut(&key)
            .ok_or_else(|| ServiceError::NotFound(format!("no account for {email}")))?;
        entry.name = name;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    pub fn delete(&self, email: &str) -> Result<(), ServiceError> {
        self.users
            .remove(&email.to_ascii_lowercase())
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("no account for {email}")))
    }
}
