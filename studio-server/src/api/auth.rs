//! Registration, login, logout and the current-user endpoint

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::info;

use super::validation::{self, MAX_FULL_NAME_LEN};
use super::{created, ok, ok_message, ApiJson};
use crate::auth::{
    clear_session_cookie, hash_password, session_id_from_headers, start_session, verify_password,
    AuthUser, MaybeUser,
};
use crate::db::{sessions, users};
use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub remember_me: bool,
}

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();

    let username = validation::require(&mut errors, "username", "Username", &req.username);
    if !username.is_empty() && !validation::is_valid_username(&username) {
        errors.add(
            "username",
            "Username must be 3-30 characters and contain only letters, numbers and underscores",
        );
    }

    let email = validation::check_email(&mut errors, &req.email);

    let password = req.password.unwrap_or_default();
    if password.is_empty() {
        errors.add("password", "Password is required");
    } else if !validation::is_strong_password(&password) {
        errors.add(
            "password",
            "Password must be at least 8 characters and contain a letter and a number",
        );
    }

    let full_name = validation::trimmed(&req.full_name);
    if full_name
        .as_deref()
        .is_some_and(|n| n.chars().count() > MAX_FULL_NAME_LEN)
    {
        errors.add("fullName", "Full name must be at most 100 characters");
    }

    errors.into_result()?;

    if users::username_exists(&state.db, &username).await? {
        return Err(ApiError::Validation(FieldErrors::single(
            "username",
            "Username already exists",
        )));
    }

    let password_hash = hash_password(password).await?;
    let user = match users::create_user(
        &state.db,
        &username,
        &email,
        &password_hash,
        full_name.as_deref(),
    )
    .await
    {
        Ok(user) => user,
        Err(e) if e.is_unique_violation() => {
            return Err(ApiError::Validation(FieldErrors::single(
                "username",
                "Username already exists",
            )))
        }
        Err(e) => return Err(e.into()),
    };

    let cookie = start_session(
        &state.db,
        user.id,
        req.remember_me,
        state.settings.secure_cookies,
    )
    .await?;

    info!(user_id = user.id, username = %user.username, "Registered new user");

    Ok((
        [(header::SET_COOKIE, cookie)],
        created("Registration successful", user),
    ))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let username = validation::trimmed(&req.username);
    let password = req.password.filter(|p| !p.is_empty());
    let (Some(username), Some(password)) = (username, password) else {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    };

    let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

    let user = users::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(password, user.password.clone()).await? {
        return Err(invalid());
    }

    let cookie = start_session(
        &state.db,
        user.id,
        req.remember_me,
        state.settings.secure_cookies,
    )
    .await?;

    info!(user_id = user.id, "User logged in");

    Ok(([(header::SET_COOKIE, cookie)], ok(user)))
}

/// POST /api/logout
pub async fn logout(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    if let Some(sid) = session_id_from_headers(&headers) {
        sessions::delete_session(&state.db, &sid).await?;
    }
    if let Some(user) = user {
        info!(user_id = user.id, "User logged out");
    }

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie(state.settings.secure_cookies))],
        ok_message("Logged out successfully"),
    ))
}

/// GET /api/user
pub async fn current_user(AuthUser(user): AuthUser) -> impl IntoResponse {
    ok(user)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/user", get(current_user))
}
