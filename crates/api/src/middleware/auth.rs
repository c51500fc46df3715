//! Session-cookie authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use dreamboard_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from the session cookie.
///
/// Use this as an extractor parameter in any handler that requires a
/// logged-in user; requests without an active session get 401.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = state
            .sessions
            .token_from_headers(&parts.headers)
            .ok_or_else(|| AppError::unauthorized("Not authenticated"))?;

        let user_id = state
            .sessions
            .resolve(&token)
            .await?
            .ok_or_else(|| AppError::unauthorized("Session is invalid or has expired"))?;

        Ok(SessionUser { user_id })
    }
}
