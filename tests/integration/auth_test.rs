//! Integration tests for the authentication flow and the session guard.

use axum::http::{StatusCode, header};
use chrono::{Duration, Utc};

use talkie_auth::jwt::JwtEncoder;
use talkie_core::types::UserId;

use super::helpers::{TEST_PASSWORD, TestApp, test_config};

#[tokio::test]
async fn test_signup_sets_cookie_and_hides_password() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(serde_json::json!({
                "fullName": "Alice",
                "email": "alice@example.com",
                "password": TEST_PASSWORD,
                "bio": "hi",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["userData"]["fullName"], "Alice");
    assert!(response.body["userData"].get("passwordHash").is_none());
    assert!(response.body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let cookie = response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Max-Age=86400"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn test_signup_missing_field_is_rejected() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(serde_json::json!({
                "fullName": "Alice",
                "email": "alice@example.com",
                "password": TEST_PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["message"], "Missing details");
    assert!(app.users.is_empty());
}

#[tokio::test]
async fn test_signup_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.signup("dup@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(serde_json::json!({
                "fullName": "Other",
                "email": "DUP@example.com",
                "password": "another",
                "bio": "x",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], "Account already exists");
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    let user = app.signup("bob@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": user.email,
                "password": TEST_PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["userData"]["_id"], user.id.as_str());
    assert!(response.headers.get(header::SET_COOKIE).is_some());
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = TestApp::new();
    let user = app.signup("carol@example.com").await;

    for (email, password) in [(user.email.as_str(), "wrong"), ("nobody@example.com", TEST_PASSWORD)] {
        let response = app
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["error"], "INVALID_CREDENTIALS");
        assert_eq!(response.body["message"], "Invalid credentials");
    }
}

#[tokio::test]
async fn test_check_accepts_every_carrier() {
    let app = TestApp::new();
    let user = app.signup("dave@example.com").await;

    let bearer = app.request("GET", "/api/auth/check", None, Some(&user.token)).await;
    assert_eq!(bearer.status, StatusCode::OK);
    assert_eq!(bearer.body["user"]["_id"], user.id.as_str());

    let cookie = format!("token={}", user.token);
    let via_cookie = app
        .request_with_headers("GET", "/api/auth/check", &[("cookie", cookie.as_str())])
        .await;
    assert_eq!(via_cookie.status, StatusCode::OK);

    let via_header = app
        .request_with_headers("POST", "/api/auth/check", &[("token", user.token.as_str())])
        .await;
    assert_eq!(via_header.status, StatusCode::OK);
}

#[tokio::test]
async fn test_check_without_token() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/auth/check", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "NO_TOKEN");
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/auth/check", None, Some("not.a.jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_expired_token_leaves_registry_untouched() {
    let app = TestApp::new();
    let user = app.signup("erin@example.com").await;
    let before = app.state.gateway.online_users();

    let encoder = JwtEncoder::new(&test_config().auth);
    let expired = encoder
        .issue_at(&UserId::from(user.id.as_str()), Utc::now() - Duration::hours(48))
        .unwrap();

    let response = app
        .request("GET", "/api/presence", None, Some(&expired.token))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "TOKEN_EXPIRED");
    assert_eq!(app.state.gateway.online_users(), before);
    assert_eq!(app.state.gateway.connection_count(), 0);
}

#[tokio::test]
async fn test_deleted_user_is_not_found() {
    let app = TestApp::new();
    let user = app.signup("frank@example.com").await;
    app.users.remove(&UserId::from(user.id.as_str()));

    let response = app.request("GET", "/api/auth/check", None, Some(&user.token)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "User not found");
}

#[tokio::test]
async fn test_update_profile() {
    let app = TestApp::new();
    let user = app.signup("grace@example.com").await;

    let response = app
        .request(
            "PUT",
            "/api/auth/update-profile",
            Some(serde_json::json!({
                "bio": "updated bio",
                "profilePic": "https://cdn.example.com/grace.png",
            })),
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["bio"], "updated bio");
    assert_eq!(response.body["user"]["fullName"], "Test User");
    assert_eq!(
        response.body["user"]["profilePic"],
        "https://cdn.example.com/grace.png"
    );

    let unauthenticated = app
        .request(
            "POST",
            "/api/auth/update-profile",
            Some(serde_json::json!({ "bio": "x" })),
            None,
        )
        .await;
    assert_eq!(unauthenticated.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new();

    let response = app.request("POST", "/api/auth/logout", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let cookie = response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_production_cookie_is_secure() {
    let mut config = test_config();
    config.server.environment = "production".to_string();
    let app = TestApp::with_config(config);

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(serde_json::json!({
                "fullName": "Heidi",
                "email": "heidi@example.com",
                "password": TEST_PASSWORD,
                "bio": "hi",
            })),
            None,
        )
        .await;

    let cookie = response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.contains("Secure"));
}
