//! Handlers for registration, login, logout and the current user.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use dreamboard_core::error::CoreError;
use dreamboard_core::validation::{
    validate_username_chars, MAX_USERNAME_LEN, MIN_PASSWORD_LEN, MIN_USERNAME_LEN,
};
use dreamboard_db::models::user::{CreateUser, UserResponse};
use dreamboard_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::middleware::auth::SessionUser;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Request body for `POST /api/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(
            min = MIN_USERNAME_LEN,
            max = MAX_USERNAME_LEN,
            message = "Username must be 3-64 characters"
        ),
        custom(function = "validate_username_chars")
    )]
    pub username: String,
    #[validate(length(min = MIN_PASSWORD_LEN, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Request body for `POST /api/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// POST /api/register
///
/// Create an account and log it in. Returns 201 with the public user and a
/// session cookie.
pub async fn register(
    State(state): State<AppState>,
    body: JsonBody,
) -> AppResult<impl IntoResponse> {
    let input: RegisterRequest = body.into_validated()?;

    if UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict("Username already exists".into()).into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // The unique constraint still guards against a concurrent registration.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            password_hash,
        },
    )
    .await?;

    let token = state.sessions.open(user.id).await?;
    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, state.sessions.session_cookie(&token))],
        Json(UserResponse::from(&user)),
    ))
}

/// POST /api/login
///
/// Verify credentials and open a session. Unknown users and wrong passwords
/// get the same 401.
pub async fn login(
    State(state): State<AppState>,
    body: JsonBody,
) -> AppResult<impl IntoResponse> {
    let input: LoginRequest = body.into_validated()?;

    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.sessions.open(user.id).await?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        [(SET_COOKIE, state.sessions.session_cookie(&token))],
        Json(UserResponse::from(&user)),
    ))
}

/// POST /api/logout
///
/// Revoke the current session, if any, and clear the cookie. Always 204.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    if let Some(token) = state.sessions.token_from_headers(&headers) {
        if state.sessions.close(&token).await? {
            tracing::info!("Session closed");
        }
    }

    Ok((
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, state.sessions.clearing_cookie())],
    ))
}

/// GET /api/user
pub async fn current_user(
    State(state): State<AppState>,
    user: SessionUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;
    Ok(Json(UserResponse::from(&user)))
}
