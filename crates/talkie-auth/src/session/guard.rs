//! Session guard: resolves a candidate token to a live user record.
//!
//! The guard is a pure gate: it never mutates token or presence state, and
//! a rejection only ever affects the request or connection that presented
//! the credential.

use std::sync::Arc;

use tracing::debug;

use talkie_core::error::{AppError, AuthFailure};
use talkie_core::result::AppResult;
use talkie_core::types::UserId;
use talkie_database::UserStore;
use talkie_entity::user::{PublicUser, User};

use crate::jwt::TokenVerifier;

/// The resolved user attached to a request or connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    /// The user record without its password hash.
    pub user: PublicUser,
}

impl AuthenticatedIdentity {
    /// Returns the authenticated user's ID.
    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }
}

impl From<User> for AuthenticatedIdentity {
    fn from(user: User) -> Self {
        Self { user: user.into() }
    }
}

/// Gate for protected entry points.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    verifier: Arc<dyn TokenVerifier>,
    users: Arc<dyn UserStore>,
}

impl SessionGuard {
    /// Creates a guard over a token verifier and the user store.
    pub fn new(verifier: Arc<dyn TokenVerifier>, users: Arc<dyn UserStore>) -> Self {
        Self { verifier, users }
    }

    /// Verifies a candidate token without touching user storage.
    ///
    /// An absent or blank candidate is rejected with `NoToken` before any
    /// verification runs.
    pub fn verify(&self, candidate: Option<&str>) -> AppResult<UserId> {
        let token = candidate
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::unauthorized(AuthFailure::NoToken, "Not authorized, token missing")
            })?;

        self.verifier.verify(token)
    }

    /// Resolves a candidate token to the user it was issued for.
    ///
    /// Fails with `Unauthorized` when the token is missing, invalid, or
    /// expired, and with `NotFound` when the user was deleted after the
    /// token was issued.
    pub async fn authorize(&self, candidate: Option<&str>) -> AppResult<AuthenticatedIdentity> {
        let user_id = self.verify(candidate)?;

        let user = self.users.find_by_id(&user_id).await?.ok_or_else(|| {
            debug!(user_id = %user_id, "Token subject no longer exists");
            AppError::not_found("User not found")
        })?;

        Ok(user.into())
    }
}
