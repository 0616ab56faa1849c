//! Mood mixtapes

use sqlx::types::Json;
use sqlx::SqlitePool;
use studio_common::db::MoodMixtape;
use studio_common::{time, Result};

use crate::agents::MixtapeDraft;

const MIXTAPE_COLUMNS: &str = "id, user_id, title, description, mood, energy, tracks, \
adaptation_count, created_at, updated_at";

pub async fn insert(
    pool: &SqlitePool,
    user_id: i64,
    mood: &str,
    energy: f64,
    draft: &MixtapeDraft,
) -> Result<MoodMixtape> {
    let now = time::now_rfc3339();
    let row = sqlx::query_as::<_, MoodMixtape>(&format!(
        "INSERT INTO mood_mixtapes \
         (user_id, title, description, mood, energy, tracks, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
        MIXTAPE_COLUMNS
    ))
    .bind(user_id)
    .bind(&draft.title)
    .bind(&draft.description)
    .bind(mood)
    .bind(energy)
    .bind(Json(&draft.tracks))
    .bind(&now)
    .bind(&now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn list_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<MoodMixtape>> {
    let rows = sqlx::query_as::<_, MoodMixtape>(&format!(
        "SELECT {} FROM mood_mixtapes WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        MIXTAPE_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<MoodMixtape>> {
    let row = sqlx::query_as::<_, MoodMixtape>(&format!(
        "SELECT {} FROM mood_mixtapes WHERE id = ?",
        MIXTAPE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Replace mood, description and tracks; bumps `adaptation_count`.
/// The title is kept. `None` when the row no longer exists.
pub async fn apply_adaptation(
    pool: &SqlitePool,
    id: i64,
    mood: &str,
    draft: &MixtapeDraft,
) -> Result<Option<MoodMixtape>> {
    let row = sqlx::query_as::<_, MoodMixtape>(&format!(
        r#"
        UPDATE mood_mixtapes SET
            mood = ?,
            description = ?,
            tracks = ?,
            adaptation_count = adaptation_count + 1,
            updated_at = ?
        WHERE id = ?
        RETURNING {}
        "#,
        MIXTAPE_COLUMNS
    ))
    .bind(mood)
    .bind(&draft.description)
    .bind(Json(&draft.tracks))
    .bind(time::now_rfc3339())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM mood_mixtapes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
