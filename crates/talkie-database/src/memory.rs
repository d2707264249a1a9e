//! In-memory user store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use talkie_core::error::AppError;
use talkie_core::result::AppResult;
use talkie_core::types::UserId;
use talkie_entity::user::{CreateUser, UpdateProfile, User};

use crate::store::UserStore;

/// Process-local user store backed by concurrent maps.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    /// User ID → user record.
    users: DashMap<UserId, User>,
    /// Lower-cased email → user ID.
    emails: DashMap<String, UserId>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a user (used to simulate deletion after token issuance).
    pub fn remove(&self, id: &UserId) -> Option<User> {
        let (_, user) = self.users.remove(id)?;
        self.emails.remove(&user.email.to_lowercase());
        Some(user)
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> AppResult<Duration> {
        Ok(Duration::ZERO)
    }

    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.emails.get(&email.to_lowercase()).map(|e| e.value().clone()) else {
            return Ok(None);
        };
        self.find_by_id(&id).await
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let id = UserId::generate();
        match self.emails.entry(data.email.to_lowercase()) {
            Entry::Occupied(_) => Err(AppError::conflict("Account already exists")),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = User {
                    id: id.clone(),
                    email: data.email,
                    full_name: data.full_name,
                    password_hash: data.password_hash,
                    profile_pic: String::new(),
                    bio: data.bio,
                    created_at: now,
                    updated_at: now,
                };
                self.users.insert(id.clone(), user.clone());
                slot.insert(id);
                Ok(user)
            }
        }
    }

    async fn update_profile(&self, id: &UserId, data: UpdateProfile) -> AppResult<Option<User>> {
        let Some(mut entry) = self.users.get_mut(id) else {
            return Ok(None);
        };
        let user = entry.value_mut();
        if let Some(full_name) = data.full_name {
            user.full_name = full_name;
        }
        if let Some(bio) = data.bio {
            user.bio = bio;
        }
        if let Some(profile_pic) = data.profile_pic {
            user.profile_pic = profile_pic;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}
