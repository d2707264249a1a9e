//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use talkie_auth::jwt::{JwtDecoder, JwtEncoder, TokenVerifier};
use talkie_auth::password::PasswordHasher;
use talkie_auth::session::SessionGuard;
use talkie_core::config::AppConfig;
use talkie_core::result::AppResult;
use talkie_database::UserStore;
use talkie_realtime::RealtimeGateway;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// User storage
    pub users: Arc<dyn UserStore>,
    /// Password hasher
    pub password_hasher: Arc<PasswordHasher>,
    /// Session token issuer
    pub jwt_encoder: Arc<JwtEncoder>,
    /// Gate for protected routes
    pub session_guard: Arc<SessionGuard>,
    /// WebSocket gateway and presence registry
    pub gateway: Arc<RealtimeGateway>,
    /// Process start time
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wires the auth components and the gateway around a user store.
    ///
    /// Fails if the password hashing cost is invalid.
    pub fn new(config: Arc<AppConfig>, users: Arc<dyn UserStore>) -> AppResult<Self> {
        let password_hasher = Arc::new(PasswordHasher::from_config(&config.auth)?);
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let verifier: Arc<dyn TokenVerifier> = Arc::new(JwtDecoder::new(&config.auth));

        let session_guard = Arc::new(SessionGuard::new(verifier.clone(), users.clone()));
        let gateway = Arc::new(RealtimeGateway::new(config.realtime.clone(), verifier));

        Ok(Self {
            config,
            users,
            password_hasher,
            jwt_encoder,
            session_guard,
            gateway,
            started_at: Utc::now(),
        })
    }
}
