//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use talkie_core::types::UserId;
use talkie_entity::user::PublicUser;
use talkie_realtime::MetricsSnapshot;

/// Returned by signup and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Always `true`.
    pub success: bool,
    /// The authenticated user.
    pub user_data: PublicUser,
    /// Session token, also set as a cookie.
    pub token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// Human-readable message.
    pub message: String,
}

/// A single user wrapped in a success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// Always `true`.
    pub success: bool,
    /// The user.
    pub user: PublicUser,
}

impl UserResponse {
    /// Wraps a user.
    pub fn ok(user: PublicUser) -> Self {
        Self {
            success: true,
            user,
        }
    }
}

/// Generic message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Current online-user set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceResponse {
    /// Always `true`.
    pub success: bool,
    /// Online user IDs, sorted.
    pub online_users: Vec<UserId>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `false` when a dependency is down.
    pub success: bool,
    /// `"ok"`, or `"degraded"` when the user store does not answer.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Seconds since start.
    pub uptime_seconds: i64,
    /// Open WebSocket connections, anonymous ones included.
    pub connections: usize,
    /// Users present in the registry.
    pub online_users: usize,
    /// User store liveness.
    pub storage: StorageHealth,
    /// Gateway counters.
    pub realtime: MetricsSnapshot,
}

/// User store section of the health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageHealth {
    /// `"postgres"` or `"memory"`.
    pub backend: String,
    /// `"up"` or `"down"`.
    pub status: String,
    /// Ping round-trip, absent when down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}
