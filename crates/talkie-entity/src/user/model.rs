//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use talkie_core::types::UserId;

/// A registered chat user as stored.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Unique user identifier.
    #[sqlx(try_from = "String")]
    pub id: UserId,
    /// Email address, unique case-insensitively.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Profile picture URL (empty when unset).
    pub profile_pic: String,
    /// Short biography.
    pub bio: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns the record with the password hash stripped.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            profile_pic: self.profile_pic.clone(),
            bio: self.bio.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            profile_pic: user.profile_pic,
            bio: user.bio,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A user record safe to hand to clients and request handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// User ID. Serialized as `_id` for compatibility with existing clients.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Profile picture URL.
    pub profile_pic: String,
    /// Short biography.
    pub bio: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Short biography.
    pub bio: String,
}

/// Profile fields a user may change. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    /// New display name.
    pub full_name: Option<String>,
    /// New biography.
    pub bio: Option<String>,
    /// New profile picture URL.
    pub profile_pic: Option<String>,
}
