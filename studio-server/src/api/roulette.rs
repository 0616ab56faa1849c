//! Rhythm Roulette: quota-limited compositions from listening history

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use studio_common::db::RhythmRouletteComposition;
use tracing::info;

use super::validation::trimmed;
use super::{check_owner, created, ok, ok_message, ApiJson, OptionalJson};
use crate::agents::hub::ROULETTE_HISTORY_WINDOW;
use crate::auth::AuthUser;
use crate::db::compositions::{self, CompositionUpdate};
use crate::db::{history, users};
use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::AppState;

pub const MAX_ROULETTE_GENERATIONS: i64 = 2;

const LIMIT_REACHED: &str = "Generation limit reached";

/// Both hints are optional, and so is the body
#[derive(Debug, Default, Deserialize)]
pub struct RouletteRequest {
    pub genre: Option<String>,
    pub mood: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompositionEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub tempo: Option<i64>,
    pub mood: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedComposition {
    pub composition: RhythmRouletteComposition,
    pub remaining_generations: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionList {
    pub compositions: Vec<RhythmRouletteComposition>,
    pub remaining_generations: i64,
}

fn remaining(used: i64) -> i64 {
    (MAX_ROULETTE_GENERATIONS - used).max(0)
}

/// POST /api/rhythm-roulette
pub async fn generate(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    OptionalJson(req): OptionalJson<RouletteRequest>,
) -> ApiResult<impl IntoResponse> {
    if user.generation_count >= MAX_ROULETTE_GENERATIONS {
        return Err(ApiError::Forbidden(LIMIT_REACHED.to_string()));
    }

    let recent = history::list_recent(&state.db, user.id, ROULETTE_HISTORY_WINDOW).await?;
    let genre = trimmed(&req.genre);
    let mood = trimmed(&req.mood);

    let draft = state
        .agents
        .compose_roulette(&recent, genre.as_deref(), mood.as_deref())
        .await?;

    let Some((composition, used)) =
        compositions::create_with_quota(&state.db, user.id, &draft, MAX_ROULETTE_GENERATIONS).await?
    else {
        return Err(ApiError::Forbidden(LIMIT_REACHED.to_string()));
    };

    info!(
        user_id = user.id,
        composition_id = composition.id,
        used,
        "Rhythm Roulette composition generated"
    );

    Ok(created(
        "Composition generated",
        GeneratedComposition {
            composition,
            remaining_generations: remaining(used),
        },
    ))
}

/// GET /api/rhythm-roulette
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl IntoResponse> {
    let compositions = compositions::list_for_user(&state.db, user.id).await?;
    let used = users::generation_count(&state.db, user.id).await?;

    Ok(ok(CompositionList {
        compositions,
        remaining_generations: remaining(used),
    }))
}

/// GET /api/rhythm-roulette/:id
pub async fn get_one(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let row = compositions::find_by_id(&state.db, id).await?;
    Ok(ok(check_owner(row, |c| c.user_id, user.id, "Composition")?))
}

/// PUT /api/rhythm-roulette/:id
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    ApiJson(edit): ApiJson<CompositionEdit>,
) -> ApiResult<impl IntoResponse> {
    let row = compositions::find_by_id(&state.db, id).await?;
    check_owner(row, |c| c.user_id, user.id, "Composition")?;

    if edit.tempo.is_some_and(|t| !(60..=200).contains(&t)) {
        return Err(ApiError::Validation(FieldErrors::single(
            "tempo",
            "Tempo must be between 60 and 200",
        )));
    }

    let updated = compositions::update(
        &state.db,
        id,
        &CompositionUpdate {
            title: trimmed(&edit.title),
            description: trimmed(&edit.description),
            genre: trimmed(&edit.genre),
            tempo: edit.tempo,
            mood: trimmed(&edit.mood),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Composition not found".to_string()))?;

    Ok(ok(updated))
}

/// DELETE /api/rhythm-roulette/:id
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let row = compositions::find_by_id(&state.db, id).await?;
    check_owner(row, |c| c.user_id, user.id, "Composition")?;
    compositions::delete(&state.db, id).await?;
    Ok(ok_message("Composition deleted"))
}

pub fn roulette_routes() -> Router<AppState> {
    Router::new()
        .route("/api/rhythm-roulette", post(generate).get(list))
        .route(
            "/api/rhythm-roulette/:id",
            get(get_one).put(update).delete(remove),
        )
}
