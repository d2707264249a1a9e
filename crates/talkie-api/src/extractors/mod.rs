//! Custom Axum extractors.

pub mod auth;
pub mod credential;
pub mod json;

pub use auth::AuthUser;
pub use credential::extract_token;
pub use json::ValidatedJson;
