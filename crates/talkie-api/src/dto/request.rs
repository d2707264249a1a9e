//! Request DTOs with validation.
//!
//! Missing fields deserialize to empty strings so that an incomplete body
//! is reported as a validation error rather than a parse failure.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signup request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupRequest {
    /// Display name.
    #[validate(length(min = 1, message = "Missing details"))]
    pub full_name: String,
    /// Email address.
    #[validate(
        length(min = 1, message = "Missing details"),
        email(message = "Invalid email address")
    )]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Missing details"))]
    pub password: String,
    /// Short biography.
    #[validate(length(min = 1, message = "Missing details"))]
    pub bio: String,
}

/// Login request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Update profile request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: Option<String>,
    /// Short biography.
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
    /// Profile picture URL.
    #[validate(url(message = "Profile picture must be a URL"))]
    pub profile_pic: Option<String>,
}

/// Query string of the WebSocket upgrade.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsQuery {
    /// Identity the client claims.
    pub user_id: Option<String>,
    /// Session token proving the claim.
    pub token: Option<String>,
}
