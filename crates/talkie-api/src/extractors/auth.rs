//! `AuthUser` extractor: runs the session guard and injects the identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::warn;

use talkie_auth::session::AuthenticatedIdentity;

use crate::error::ApiError;
use crate::state::AppState;

use super::credential::extract_token;

/// Extracted authenticated user available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthenticatedIdentity);

impl std::ops::Deref for AuthUser {
    type Target = AuthenticatedIdentity;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers, &state.config.auth.cookie_name);

        match state.session_guard.authorize(token.as_deref()).await {
            Ok(identity) => Ok(AuthUser(identity)),
            Err(err) => {
                warn!(
                    path = %parts.uri.path(),
                    kind = %err.kind,
                    "Request rejected by session guard"
                );
                Err(err.into())
            }
        }
    }
}
