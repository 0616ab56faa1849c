//! Saved beats, avatars and voice samples
//!
//! All routes require a session; rows are only visible to their owner.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use tracing::info;

use super::validation::{require, trimmed};
use super::{check_owner, created, ok, ok_message, ApiJson};
use crate::auth::AuthUser;
use crate::db::creations::{self, NewAvatar, NewBeat, NewVoiceSample};
use crate::error::{ApiResult, FieldErrors};
use crate::AppState;

pub const MIN_BEAT_BPM: i64 = 40;
pub const MAX_BEAT_BPM: i64 = 240;
pub const MAX_BEAT_DURATION_SECS: f64 = 600.0;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatRequest {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub bpm: Option<f64>,
    pub mood: Option<String>,
    pub duration: Option<f64>,
    pub audio_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarRequest {
    pub name: Option<String>,
    pub style: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSampleRequest {
    pub name: Option<String>,
    pub pitch: Option<f64>,
    pub tone: Option<String>,
    pub accent: Option<String>,
    pub emotion: Option<String>,
    pub sample_text: Option<String>,
    pub duration: Option<f64>,
}

fn validate_beat(req: BeatRequest) -> ApiResult<NewBeat> {
    let mut errors = FieldErrors::new();

    let title = require(&mut errors, "title", "Title", &req.title);
    let genre = require(&mut errors, "genre", "Genre", &req.genre);
    let mood = require(&mut errors, "mood", "Mood", &req.mood);

    let bpm = match req.bpm {
        Some(bpm)
            if bpm.fract() == 0.0
                && (MIN_BEAT_BPM as f64..=MAX_BEAT_BPM as f64).contains(&bpm) =>
        {
            bpm as i64
        }
        Some(_) => {
            errors.add("bpm", "BPM must be a whole number between 40 and 240");
            0
        }
        None => {
            errors.add("bpm", "BPM is required");
            0
        }
    };

    let duration = match req.duration {
        Some(d) if d.is_finite() && d > 0.0 && d <= MAX_BEAT_DURATION_SECS => d,
        Some(_) => {
            errors.add(
                "duration",
                "Duration must be greater than 0 and at most 600 seconds",
            );
            0.0
        }
        None => {
            errors.add("duration", "Duration is required");
            0.0
        }
    };

    errors.into_result()?;

    Ok(NewBeat {
        title,
        genre,
        bpm,
        mood,
        duration,
        audio_url: trimmed(&req.audio_url),
    })
}

fn validate_avatar(req: AvatarRequest) -> ApiResult<NewAvatar> {
    let mut errors = FieldErrors::new();
    let name = require(&mut errors, "name", "Name", &req.name);
    let style = require(&mut errors, "style", "Style", &req.style);
    errors.into_result()?;

    Ok(NewAvatar {
        name,
        style,
        description: trimmed(&req.description),
        image_url: trimmed(&req.image_url),
    })
}

fn validate_voice_sample(req: VoiceSampleRequest) -> ApiResult<NewVoiceSample> {
    let mut errors = FieldErrors::new();

    let name = require(&mut errors, "name", "Name", &req.name);
    let tone = require(&mut errors, "tone", "Tone", &req.tone);
    let accent = require(&mut errors, "accent", "Accent", &req.accent);
    let emotion = require(&mut errors, "emotion", "Emotion", &req.emotion);

    let pitch = match req.pitch {
        Some(p) if p.is_finite() && p > 0.0 => p,
        Some(_) => {
            errors.add("pitch", "Pitch must be a positive number");
            0.0
        }
        None => {
            errors.add("pitch", "Pitch is required");
            0.0
        }
    };

    let duration = match req.duration {
        Some(d) if d.is_finite() && d > 0.0 => d,
        Some(_) => {
            errors.add("duration", "Duration must be greater than 0");
            0.0
        }
        None => {
            errors.add("duration", "Duration is required");
            0.0
        }
    };

    errors.into_result()?;

    Ok(NewVoiceSample {
        name,
        pitch,
        tone,
        accent,
        emotion,
        sample_text: trimmed(&req.sample_text),
        duration,
    })
}

// ---- beats ----

pub async fn list_beats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl IntoResponse> {
    Ok(ok(creations::list_beats(&state.db, user.id).await?))
}

pub async fn create_beat(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<BeatRequest>,
) -> ApiResult<impl IntoResponse> {
    let beat = validate_beat(req)?;
    let row = creations::insert_beat(&state.db, user.id, &beat).await?;
    info!(user_id = user.id, beat_id = row.id, "Beat saved");
    Ok(created("Beat saved", row))
}

pub async fn delete_beat(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let row = creations::find_beat(&state.db, id).await?;
    check_owner(row, |b| b.user_id, user.id, "Beat")?;
    creations::delete_beat(&state.db, id).await?;
    Ok(ok_message("Beat deleted"))
}

// ---- avatars ----

pub async fn list_avatars(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl IntoResponse> {
    Ok(ok(creations::list_avatars(&state.db, user.id).await?))
}

pub async fn create_avatar(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<AvatarRequest>,
) -> ApiResult<impl IntoResponse> {
    let avatar = validate_avatar(req)?;
    let row = creations::insert_avatar(&state.db, user.id, &avatar).await?;
    info!(user_id = user.id, avatar_id = row.id, "Avatar saved");
    Ok(created("Avatar saved", row))
}

pub async fn delete_avatar(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let row = creations::find_avatar(&state.db, id).await?;
    check_owner(row, |a| a.user_id, user.id, "Avatar")?;
    creations::delete_avatar(&state.db, id).await?;
    Ok(ok_message("Avatar deleted"))
}

// ---- voice samples ----

pub async fn list_voice_samples(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl IntoResponse> {
    Ok(ok(creations::list_voice_samples(&state.db, user.id).await?))
}

pub async fn create_voice_sample(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<VoiceSampleRequest>,
) -> ApiResult<impl IntoResponse> {
    let sample = validate_voice_sample(req)?;
    let row = creations::insert_voice_sample(&state.db, user.id, &sample).await?;
    info!(user_id = user.id, sample_id = row.id, "Voice sample saved");
    Ok(created("Voice sample saved", row))
}

pub async fn delete_voice_sample(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let row = creations::find_voice_sample(&state.db, id).await?;
    check_owner(row, |s| s.user_id, user.id, "Voice sample")?;
    creations::delete_voice_sample(&state.db, id).await?;
    Ok(ok_message("Voice sample deleted"))
}

pub fn creation_routes() -> Router<AppState> {
    Router::new()
        .route("/api/beats", get(list_beats).post(create_beat))
        .route("/api/beats/:id", delete(delete_beat))
        .route("/api/avatars", get(list_avatars).post(create_avatar))
        .route("/api/avatars/:id", delete(delete_avatar))
        .route(
            "/api/voice-samples",
            get(list_voice_samples).post(create_voice_sample),
        )
        .route("/api/voice-samples/:id", delete(delete_voice_sample))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beat(bpm: Option<f64>, duration: Option<f64>) -> BeatRequest {
        BeatRequest {
            title: Some("Late Night".into()),
            genre: Some("lofi".into()),
            bpm,
            mood: Some("chill".into()),
            duration,
            audio_url: None,
        }
    }

    #[test]
    fn test_beat_bounds() {
        assert!(validate_beat(beat(Some(40.0), Some(600.0))).is_ok());
        assert!(validate_beat(beat(Some(240.0), Some(0.5))).is_ok());
        assert!(validate_beat(beat(Some(39.0), Some(30.0))).is_err());
        assert!(validate_beat(beat(Some(241.0), Some(30.0))).is_err());
        assert!(validate_beat(beat(Some(90.5), Some(30.0))).is_err());
        assert!(validate_beat(beat(Some(90.0), Some(0.0))).is_err());
        assert!(validate_beat(beat(Some(90.0), Some(600.1))).is_err());
    }

    #[test]
    fn test_beat_missing_fields_reported_per_field() {
        let err = validate_beat(BeatRequest {
            title: None,
            genre: None,
            bpm: None,
            mood: None,
            duration: None,
            audio_url: None,
        })
        .unwrap_err();

        match err {
            crate::ApiError::Validation(errors) => {
                for field in ["title", "genre", "bpm", "mood", "duration"] {
                    assert!(errors.get(field).is_some(), "missing error for {}", field);
                }
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_voice_sample_requires_positive_pitch() {
        let req = VoiceSampleRequest {
            name: Some("Warm take".into()),
            pitch: Some(-3.0),
            tone: Some("warm".into()),
            accent: Some("neutral".into()),
            emotion: Some("happy".into()),
            sample_text: None,
            duration: Some(4.0),
        };
        assert!(validate_voice_sample(req).is_err());
    }
}
