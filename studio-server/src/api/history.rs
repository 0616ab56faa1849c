//! Listening history

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;

use super::validation::{require, trimmed};
use super::{created, ok, ApiJson};
use crate::auth::AuthUser;
use crate::db::history::{self, NewHistoryEntry};
use crate::error::{ApiResult, FieldErrors};
use crate::AppState;

pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
pub const MAX_HISTORY_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    pub track_title: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub mood: Option<String>,
    pub tempo: Option<i64>,
}

/// Requested page size, clamped to 1..=200
fn effective_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

/// GET /api/listening-history
pub async fn list_history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<impl IntoResponse> {
    let entries = history::list_recent(&state.db, user.id, effective_limit(query.limit)).await?;
    Ok(ok(entries))
}

/// POST /api/listening-history
pub async fn add_history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<HistoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();
    let track_title = require(&mut errors, "trackTitle", "Track title", &req.track_title);
    let artist = require(&mut errors, "artist", "Artist", &req.artist);
    if req.tempo.is_some_and(|t| t <= 0) {
        errors.add("tempo", "Tempo must be a positive number");
    }
    errors.into_result()?;

    let entry = history::insert_entry(
        &state.db,
        user.id,
        &NewHistoryEntry {
            track_title,
            artist,
            genre: trimmed(&req.genre),
            mood: trimmed(&req.mood),
            tempo: req.tempo,
        },
    )
    .await?;

    Ok(created("Listening history updated", entry))
}

pub fn history_routes() -> Router<AppState> {
    Router::new().route("/api/listening-history", get(list_history).post(add_history))
}
