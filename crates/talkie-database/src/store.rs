//! The user-storage contract consumed by authentication and handlers.

use std::time::Duration;

use async_trait::async_trait;

use talkie_core::result::AppResult;
use talkie_core::types::UserId;
use talkie_entity::user::{CreateUser, UpdateProfile, User};

/// Persistent user storage.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    /// Checks that the backend answers and returns the round-trip time.
    async fn ping(&self) -> AppResult<Duration>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user. Fails with a conflict if the email is taken.
    async fn create(&self, data: CreateUser) -> AppResult<User>;

    /// Apply a profile update and return the updated record, or `None` if
    /// the user does not exist.
    async fn update_profile(&self, id: &UserId, data: UpdateProfile) -> AppResult<Option<User>>;
}
