//! Auth handlers: signup, login, check, update-profile, logout.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use tracing::info;

use talkie_auth::jwt::IssuedToken;
use talkie_core::error::{AppError, AuthFailure};
use talkie_entity::user::{CreateUser, UpdateProfile, User};

use crate::dto::request::{LoginRequest, SignupRequest, UpdateProfileRequest};
use crate::dto::response::{AuthResponse, MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::conflict("Account already exists").into());
    }

    let password_hash = state.password_hasher.hash_password(&req.password)?;
    let user = state
        .users
        .create(CreateUser {
            email: req.email,
            full_name: req.full_name,
            password_hash,
            bio: req.bio,
        })
        .await?;

    info!(user_id = %user.id, "User signed up");

    let (jar, body) = session_response(&state, jar, user, "Account created successfully")?;
    Ok((StatusCode::CREATED, jar, Json(body)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let invalid = || AppError::unauthorized(AuthFailure::InvalidCredentials, "Invalid credentials");

    let Some(user) = state.users.find_by_email(&req.email).await? else {
        state.password_hasher.verify_unknown_account(&req.password);
        return Err(invalid().into());
    };

    if !state
        .password_hasher
        .verify_password(&req.password, &user.password_hash)?
    {
        return Err(invalid().into());
    }

    info!(user_id = %user.id, "User logged in");

    let (jar, body) = session_response(&state, jar, user, "Login successful")?;
    Ok((jar, Json(body)))
}

/// GET|POST /api/auth/check
pub async fn check(auth: AuthUser) -> Json<UserResponse> {
    Json(UserResponse::ok(auth.0.user))
}

/// PUT|POST /api/auth/update-profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let updated = state
        .users
        .update_profile(
            auth.user_id(),
            UpdateProfile {
                full_name: req.full_name,
                bio: req.bio,
                profile_pic: req.profile_pic,
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    info!(user_id = %updated.id, "Profile updated");

    Ok(Json(UserResponse::ok(updated.into())))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let removal = Cookie::build((state.config.auth.cookie_name.clone(), "")).path("/");
    (
        jar.remove(removal),
        Json(MessageResponse::ok("Logged out successfully")),
    )
}

/// Issues a token for `user`, sets it as a cookie, and builds the body.
fn session_response(
    state: &AppState,
    jar: CookieJar,
    user: User,
    message: &str,
) -> Result<(CookieJar, AuthResponse), AppError> {
    let IssuedToken { token, expires_at } = state.jwt_encoder.issue(&user.id)?;

    let cookie = session_cookie(state, token.clone());
    let body = AuthResponse {
        success: true,
        user_data: user.into(),
        token,
        expires_at,
        message: message.to_string(),
    };

    Ok((jar.add(cookie), body))
}

/// Builds the session cookie: HTTP-only, strict same-site, secure in
/// production, expiring with the token.
fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let max_age = time::Duration::seconds(state.jwt_encoder.ttl().num_seconds());

    Cookie::build((state.config.auth.cookie_name.clone(), token))
        .http_only(true)
        .secure(state.config.is_production())
        .same_site(SameSite::Strict)
        .max_age(max_age)
        .path("/")
        .build()
}
