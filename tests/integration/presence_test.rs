//! Integration tests for the presence and health endpoints.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;

use talkie_core::error::AppError;
use talkie_core::result::AppResult;
use talkie_core::types::UserId;
use talkie_database::{MemoryUserStore, UserStore};
use talkie_entity::user::{CreateUser, UpdateProfile, User};

use super::helpers::{TestApp, test_config};

/// Store whose backend never answers a ping.
#[derive(Debug)]
struct UnreachableStore(Arc<MemoryUserStore>);

#[async_trait]
impl UserStore for UnreachableStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> AppResult<Duration> {
        Err(AppError::database("connection refused"))
    }

    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        self.0.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.0.find_by_email(email).await
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        self.0.create(data).await
    }

    async fn update_profile(&self, id: &UserId, data: UpdateProfile) -> AppResult<Option<User>> {
        self.0.update_profile(id, data).await
    }
}

#[tokio::test]
async fn test_status_endpoint() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/status", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "Server is live");
}

#[tokio::test]
async fn test_health_reports_gateway() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["connections"], 0);
    assert_eq!(response.body["onlineUsers"], 0);
    assert!(response.body["realtime"].get("broadcasts").is_some());
    assert_eq!(response.body["storage"]["backend"], "memory");
    assert_eq!(response.body["storage"]["status"], "up");
}

#[tokio::test]
async fn test_health_reports_unreachable_store() {
    let users = Arc::new(MemoryUserStore::new());
    let store: Arc<dyn UserStore> = Arc::new(UnreachableStore(users.clone()));
    let app = TestApp::with_store(test_config(), users, store);

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["status"], "degraded");
    assert_eq!(response.body["storage"]["backend"], "postgres");
    assert_eq!(response.body["storage"]["status"], "down");
    assert!(response.body["storage"].get("latencyMs").is_none());

    // Liveness does not depend on storage.
    let status = app.request("GET", "/api/status", None, None).await;
    assert_eq!(status.status, StatusCode::OK);
}

#[tokio::test]
async fn test_presence_requires_session() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/presence", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let user = app.signup("ivan@example.com").await;
    let response = app.request("GET", "/api/presence", None, Some(&user.token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["onlineUsers"], serde_json::json!([]));
}
