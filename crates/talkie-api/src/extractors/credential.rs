//! Locates the session token a client presented.
//!
//! Carriers are checked in a fixed order: the session cookie, then an
//! `Authorization: Bearer` header, then a raw `token` header. The first
//! non-empty value wins.
//!
//! The raw `token` header is a legacy carrier and ranks below `Bearer` on
//! purpose: a request carrying both is authorized by the standard header.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum_extra::extract::CookieJar;

/// Name of the raw token header.
pub const TOKEN_HEADER: &str = "token";

/// Returns the first session token found in the request headers.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    from_cookie(headers, cookie_name)
        .or_else(|| from_bearer(headers))
        .or_else(|| from_token_header(headers))
}

fn from_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|c| c.value().trim().to_string())
        .filter(|v| !v.is_empty())
}

fn from_bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn from_token_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
