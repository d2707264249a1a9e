//! Liveness and health endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use tracing::warn;

use crate::dto::response::{HealthResponse, StorageHealth};
use crate::state::AppState;

/// GET /api/status
pub async fn status() -> &'static str {
    "Server is live"
}

/// GET /api/health
///
/// Answers 503 while the user store is unreachable.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let backend = state.users.backend().to_string();
    let storage = match state.users.ping().await {
        Ok(latency) => StorageHealth {
            backend,
            status: "up".to_string(),
            latency_ms: Some(latency.as_millis() as u64),
        },
        Err(err) => {
            warn!(backend = %backend, error = %err, "User store health check failed");
            StorageHealth {
                backend,
                status: "down".to_string(),
                latency_ms: None,
            }
        }
    };

    let healthy = storage.latency_ms.is_some();
    let (code, status) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        success: healthy,
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
        connections: state.gateway.connection_count(),
        online_users: state.gateway.registry().len(),
        storage,
        realtime: state.gateway.metrics(),
    };
    (code, Json(body))
}
