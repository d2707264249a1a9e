//! Session token verification.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use talkie_core::config::AuthConfig;
use talkie_core::error::{AppError, AuthFailure};
use talkie_core::types::UserId;

use super::claims::Claims;

/// Resolves a presented token to the user it was issued for.
pub trait TokenVerifier: Send + Sync + std::fmt::Debug + 'static {
    /// Verifies `token` and returns its subject.
    ///
    /// Fails with `Unauthorized(InvalidToken)` for malformed or badly signed
    /// tokens and `Unauthorized(Expired)` once the validity window has passed.
    fn verify(&self, token: &str) -> Result<UserId, AppError>;
}

/// Validates HS256 session tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token, returning its claims.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                debug!(error = %e, "Session token rejected");
                match e.kind() {
                    JwtErrorKind::ExpiredSignature => {
                        AppError::unauthorized(AuthFailure::Expired, "Token has expired")
                    }
                    JwtErrorKind::InvalidSignature => {
                        AppError::unauthorized(AuthFailure::InvalidToken, "Invalid token signature")
                    }
                    _ => AppError::unauthorized(AuthFailure::InvalidToken, "Invalid token"),
                }
            })?;

        Ok(token_data.claims)
    }
}

impl TokenVerifier for JwtDecoder {
    fn verify(&self, token: &str) -> Result<UserId, AppError> {
        self.decode_claims(token).map(|claims| claims.sub)
    }
}
