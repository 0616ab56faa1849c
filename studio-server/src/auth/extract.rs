//! Request extractors resolving the session cookie to a user

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use studio_common::db::User;

use super::session::session_id_from_headers;
use crate::db::{sessions, users};
use crate::error::ApiError;
use crate::AppState;

async fn current_user(parts: &Parts, state: &AppState) -> Result<Option<User>, ApiError> {
    let Some(sid) = session_id_from_headers(&parts.headers) else {
        return Ok(None);
    };
    let Some(session) = sessions::find_active(&state.db, &sid).await? else {
        return Ok(None);
    };
    Ok(users::find_by_id(&state.db, session.user_id).await?)
}

/// Logged-in user; rejects with 401 otherwise
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        current_user(parts, state)
            .await?
            .map(AuthUser)
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))
    }
}

/// Logged-in user if there is one
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(current_user(parts, state).await?))
    }
}
