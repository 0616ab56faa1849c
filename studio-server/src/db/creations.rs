//! Beats, avatars and voice samples saved by users

use sqlx::SqlitePool;
use studio_common::db::{UserAvatar, UserBeat, UserVoiceSample};
use studio_common::{time, Result};

const BEAT_COLUMNS: &str = "id, user_id, title, genre, bpm, mood, duration, audio_url, created_at";
const AVATAR_COLUMNS: &str = "id, user_id, name, style, description, image_url, created_at";
const VOICE_COLUMNS: &str =
    "id, user_id, name, pitch, tone, accent, emotion, sample_text, duration, created_at";

#[derive(Debug, Clone)]
pub struct NewBeat {
    pub title: String,
    pub genre: String,
    pub bpm: i64,
    pub mood: String,
    pub duration: f64,
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAvatar {
    pub name: String,
    pub style: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewVoiceSample {
    pub name: String,
    pub pitch: f64,
    pub tone: String,
    pub accent: String,
    pub emotion: String,
    pub sample_text: Option<String>,
    pub duration: f64,
}

// ---- beats ----

pub async fn list_beats(pool: &SqlitePool, user_id: i64) -> Result<Vec<UserBeat>> {
    let rows = sqlx::query_as::<_, UserBeat>(&format!(
        "SELECT {} FROM user_beats WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        BEAT_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn insert_beat(pool: &SqlitePool, user_id: i64, beat: &NewBeat) -> Result<UserBeat> {
    let row = sqlx::query_as::<_, UserBeat>(&format!(
        "INSERT INTO user_beats (user_id, title, genre, bpm, mood, duration, audio_url, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
        BEAT_COLUMNS
    ))
    .bind(user_id)
    .bind(&beat.title)
    .bind(&beat.genre)
    .bind(beat.bpm)
    .bind(&beat.mood)
    .bind(beat.duration)
    .bind(&beat.audio_url)
    .bind(time::now_rfc3339())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn find_beat(pool: &SqlitePool, id: i64) -> Result<Option<UserBeat>> {
    let row = sqlx::query_as::<_, UserBeat>(&format!(
        "SELECT {} FROM user_beats WHERE id = ?",
        BEAT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_beat(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM user_beats WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

// ---- avatars ----

pub async fn list_avatars(pool: &SqlitePool, user_id: i64) -> Result<Vec<UserAvatar>> {
    let rows = sqlx::query_as::<_, UserAvatar>(&format!(
        "SELECT {} FROM user_avatars WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        AVATAR_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn insert_avatar(
    pool: &SqlitePool,
    user_id: i64,
    avatar: &NewAvatar,
) -> Result<UserAvatar> {
    let row = sqlx::query_as::<_, UserAvatar>(&format!(
        "INSERT INTO user_avatars (user_id, name, style, description, image_url, created_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING {}",
        AVATAR_COLUMNS
    ))
    .bind(user_id)
    .bind(&avatar.name)
    .bind(&avatar.style)
    .bind(&avatar.description)
    .bind(&avatar.image_url)
    .bind(time::now_rfc3339())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn find_avatar(pool: &SqlitePool, id: i64) -> Result<Option<UserAvatar>> {
    let row = sqlx::query_as::<_, UserAvatar>(&format!(
        "SELECT {} FROM user_avatars WHERE id = ?",
        AVATAR_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_avatar(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM user_avatars WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

// ---- voice samples ----

pub async fn list_voice_samples(pool: &SqlitePool, user_id: i64) -> Result<Vec<UserVoiceSample>> {
    let rows = sqlx::query_as::<_, UserVoiceSample>(&format!(
        "SELECT {} FROM user_voice_samples WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        VOICE_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn insert_voice_sample(
    pool: &SqlitePool,
    user_id: i64,
    sample: &NewVoiceSample,
) -> Result<UserVoiceSample> {
    let row = sqlx::query_as::<_, UserVoiceSample>(&format!(
        "INSERT INTO user_voice_samples \
         (user_id, name, pitch, tone, accent, emotion, sample_text, duration, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
        VOICE_COLUMNS
    ))
    .bind(user_id)
    .bind(&sample.name)
    .bind(sample.pitch)
    .bind(&sample.tone)
    .bind(&sample.accent)
    .bind(&sample.emotion)
    .bind(&sample.sample_text)
    .bind(sample.duration)
    .bind(time::now_rfc3339())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn find_voice_sample(pool: &SqlitePool, id: i64) -> Result<Option<UserVoiceSample>> {
    let row = sqlx::query_as::<_, UserVoiceSample>(&format!(
        "SELECT {} FROM user_voice_samples WHERE id = ?",
        VOICE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_voice_sample(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM user_voice_samples WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
