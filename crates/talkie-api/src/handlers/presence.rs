//! Presence query handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::PresenceResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/presence
pub async fn online_users(State(state): State<AppState>, _auth: AuthUser) -> Json<PresenceResponse> {
    Json(PresenceResponse {
        success: true,
        online_users: state.gateway.online_users().into_users(),
    })
}
