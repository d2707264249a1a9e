//! PostgreSQL user repository.

use async_trait::async_trait;
use std::time::Duration;


use talkie_core::error::{AppError, ErrorKind};
use talkie_core::result::AppResult;
use talkie_core::types::UserId;
use talkie_entity::user::{CreateUser, UpdateProfile, User};

use crate::connection::DatabasePool;
use crate::store::UserStore;

const USER_COLUMNS: &str =
    "id, email, full_name, password_hash, profile_pic, bio, created_at, updated_at";

/// Repository for user queries against the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    db: DatabasePool,
}

impl PgUserRepository {
    /// Create a new user repository.
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> AppResult<Duration> {
        self.db.ping().await
    }

    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.as_str())
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by email", e))
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let id = UserId::generate();
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, full_name, password_hash, bio) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(&data.email)
        .bind(&data.full_name)
        .bind(&data.password_hash)
        .bind(&data.bio)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| {
            if e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AppError::conflict("Account already exists")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create user", e)
            }
        })
    }

    async fn update_profile(&self, id: &UserId, data: UpdateProfile) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
                 full_name = COALESCE($2, full_name), \
                 bio = COALESCE($3, bio), \
                 profile_pic = COALESCE($4, profile_pic), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(data.full_name)
        .bind(data.bio)
        .bind(data.profile_pic)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update user", e))
    }
}
