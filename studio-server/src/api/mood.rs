//! Mood detection and mood-driven mixtapes

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use studio_common::db::MoodDetectionSession;
use tracing::info;

use super::validation::{require, trimmed};
use super::{check_owner, created, ok, ok_message, ApiJson};
use crate::agents::hub::{DEFAULT_MIXTAPE_TRACKS, MAX_MIXTAPE_TRACKS, MIN_MIXTAPE_TRACKS};
use crate::agents::parse::clamp_unit;
use crate::agents::MoodReading;
use crate::auth::AuthUser;
use crate::db::{mixtapes, mood_sessions};
use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::AppState;

const DEFAULT_ENERGY: f64 = 0.5;

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixtapeRequest {
    pub mood: Option<String>,
    pub energy: Option<f64>,
    pub track_count: Option<i64>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdaptRequest {
    pub mood: Option<String>,
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectResponse {
    #[serde(flatten)]
    pub reading: MoodReading,
    pub session: MoodDetectionSession,
}

/// Requested track count clamped to 5..=20, default 10
fn track_count(requested: Option<i64>) -> usize {
    match requested {
        Some(n) => n.clamp(MIN_MIXTAPE_TRACKS as i64, MAX_MIXTAPE_TRACKS as i64) as usize,
        None => DEFAULT_MIXTAPE_TRACKS,
    }
}

/// POST /api/mood/detect
pub async fn detect(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<DetectRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();
    let text = require(&mut errors, "text", "Text", &req.text);
    errors.into_result()?;

    let reading = state.agents.detect_mood(&text).await?;
    let session = mood_sessions::insert(&state.db, user.id, &text, &reading).await?;

    info!(user_id = user.id, mood = %reading.mood, "Mood detected");

    Ok(created("Mood detected", DetectResponse { reading, session }))
}

/// POST /api/mixtape/generate
pub async fn generate_mixtape(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<MixtapeRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();
    let mood = require(&mut errors, "mood", "Mood", &req.mood).to_lowercase();
    errors.into_result()?;

    let energy = clamp_unit(req.energy, DEFAULT_ENERGY);
    let count = track_count(req.track_count);
    let title = trimmed(&req.title);

    let draft = state
        .agents
        .generate_mixtape(&mood, energy, count, title.as_deref())
        .await?;
    let mixtape = mixtapes::insert(&state.db, user.id, &mood, energy, &draft).await?;

    info!(
        user_id = user.id,
        mixtape_id = mixtape.id,
        tracks = mixtape.tracks.0.len(),
        "Mixtape generated"
    );

    Ok(created("Mixtape generated", mixtape))
}

/// POST /api/mixtape/:id/adapt
pub async fn adapt_mixtape(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<AdaptRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();
    let mood = require(&mut errors, "mood", "Mood", &req.mood).to_lowercase();
    errors.into_result()?;

    let row = mixtapes::find_by_id(&state.db, id).await?;
    let current = check_owner(row, |m| m.user_id, user.id, "Mixtape")?;

    let feedback = trimmed(&req.feedback);
    let draft = state
        .agents
        .adapt_mixtape(&current, &mood, feedback.as_deref())
        .await?;
    // Deleted while the agent was working
    let adapted = mixtapes::apply_adaptation(&state.db, id, &mood, &draft)
        .await?
        .ok_or_else(|| ApiError::NotFound("Mixtape not found".to_string()))?;

    info!(
        user_id = user.id,
        mixtape_id = id,
        adaptations = adapted.adaptation_count,
        "Mixtape adapted"
    );

    Ok(ok(adapted))
}

/// GET /api/mixtapes
pub async fn list_mixtapes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl IntoResponse> {
    Ok(ok(mixtapes::list_for_user(&state.db, user.id).await?))
}

/// DELETE /api/mixtapes/:id
pub async fn delete_mixtape(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let row = mixtapes::find_by_id(&state.db, id).await?;
    check_owner(row, |m| m.user_id, user.id, "Mixtape")?;
    mixtapes::delete(&state.db, id).await?;
    Ok(ok_message("Mixtape deleted"))
}

pub fn mood_routes() -> Router<AppState> {
    Router::new()
        .route("/api/mood/detect", post(detect))
        .route("/api/mixtape/generate", post(generate_mixtape))
        .route("/api/mixtape/:id/adapt", post(adapt_mixtape))
        .route("/api/mixtapes", get(list_mixtapes))
        .route("/api/mixtapes/:id", delete(delete_mixtape))
}
