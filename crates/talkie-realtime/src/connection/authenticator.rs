//! Connect-time identity check for WebSocket clients.
//!
//! Clients announce a `userId` when they connect. With verification on,
//! that claim must be backed by a session token whose subject is the same
//! user; otherwise the connection is refused before it reaches the
//! presence registry.

use std::sync::Arc;

use tracing::warn;

use talkie_auth::jwt::TokenVerifier;
use talkie_core::error::{AppError, AuthFailure};
use talkie_core::result::AppResult;
use talkie_core::types::UserId;

/// Decides which identity, if any, a new connection is registered under.
#[derive(Debug, Clone)]
pub struct ConnectAuthenticator {
    verifier: Arc<dyn TokenVerifier>,
    verify_identity: bool,
}

impl ConnectAuthenticator {
    /// Creates a new authenticator.
    pub fn new(verifier: Arc<dyn TokenVerifier>, verify_identity: bool) -> Self {
        Self {
            verifier,
            verify_identity,
        }
    }

    /// Resolves the identity for a connection attempt.
    ///
    /// - no (or blank) `claimed` user: `Ok(None)`, the connection stays
    ///   anonymous and never appears in presence;
    /// - verification off: the claim is trusted as-is;
    /// - verification on: `token` must verify and name the claimed user.
    pub fn authenticate(&self, claimed: Option<&str>, token: Option<&str>) -> AppResult<Option<UserId>> {
        let Some(claimed) = claimed.and_then(UserId::parse) else {
            return Ok(None);
        };

        if !self.verify_identity {
            return Ok(Some(claimed));
        }

        let token = token.map(str::trim).filter(|t| !t.is_empty()).ok_or_else(|| {
            AppError::unauthorized(AuthFailure::NoToken, "Not authorized, token missing")
        })?;

        let subject = self.verifier.verify(token)?;
        if subject != claimed {
            warn!(
                claimed = %claimed,
                subject = %subject,
                "Connection claimed an identity its token does not prove"
            );
            return Err(AppError::unauthorized(
                AuthFailure::IdentityMismatch,
                "Token does not match userId",
            ));
        }

        Ok(Some(claimed))
    }
}
