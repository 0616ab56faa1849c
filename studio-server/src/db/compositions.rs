//! Rhythm Roulette compositions and the per-user generation quota

use sqlx::types::Json;
use sqlx::SqlitePool;
use studio_common::db::RhythmRouletteComposition;
use studio_common::{time, Result};
use tracing::debug;

use crate::agents::CompositionDraft;

const COMPOSITION_COLUMNS: &str = "id, user_id, title, description, genre, tempo, mood, \
instruments, structure, created_at, updated_at";

/// Fields a user may edit after generation; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct CompositionUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub tempo: Option<i64>,
    pub mood: Option<String>,
}

/// Store a composition and consume one generation in a single transaction.
///
/// The counter update is guarded by `generation_count < max_generations`.
/// When the guard matches no row the transaction is rolled back and `None`
/// is returned. Otherwise returns the stored row and the new count.
pub async fn create_with_quota(
    pool: &SqlitePool,
    user_id: i64,
    draft: &CompositionDraft,
    max_generations: i64,
) -> Result<Option<(RhythmRouletteComposition, i64)>> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        "UPDATE users SET generation_count = generation_count + 1 \
         WHERE id = ? AND generation_count < ?",
    )
    .bind(user_id)
    .bind(max_generations)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        tx.rollback().await?;
        debug!(user_id, "Generation quota exhausted, nothing stored");
        return Ok(None);
    }

    let count: i64 = sqlx::query_scalar("SELECT generation_count FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

    let now = time::now_rfc3339();
    let composition = sqlx::query_as::<_, RhythmRouletteComposition>(&format!(
        "INSERT INTO rhythm_roulette_compositions \
         (user_id, title, description, genre, tempo, mood, instruments, structure, \
          created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
        COMPOSITION_COLUMNS
    ))
    .bind(user_id)
    .bind(&draft.title)
    .bind(&draft.description)
    .bind(&draft.genre)
    .bind(draft.tempo)
    .bind(&draft.mood)
    .bind(Json(&draft.instruments))
    .bind(Json(&draft.structure))
    .bind(&now)
    .bind(&now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Some((composition, count)))
}

pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<RhythmRouletteComposition>> {
    let rows = sqlx::query_as::<_, RhythmRouletteComposition>(&format!(
        "SELECT {} FROM rhythm_roulette_compositions WHERE user_id = ? \
         ORDER BY created_at DESC, id DESC",
        COMPOSITION_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<RhythmRouletteComposition>> {
    let row = sqlx::query_as::<_, RhythmRouletteComposition>(&format!(
        "SELECT {} FROM rhythm_roulette_compositions WHERE id = ?",
        COMPOSITION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// `None` when the row no longer exists
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    changes: &CompositionUpdate,
) -> Result<Option<RhythmRouletteComposition>> {
    let row = sqlx::query_as::<_, RhythmRouletteComposition>(&format!(
        r#"
        UPDATE rhythm_roulette_compositions SET
            title = COALESCE(?, title),
            description = COALESCE(?, description),
            genre = COALESCE(?, genre),
            tempo = COALESCE(?, tempo),
            mood = COALESCE(?, mood),
            updated_at = ?
        WHERE id = ?
        RETURNING {}
        "#,
        COMPOSITION_COLUMNS
    ))
    .bind(&changes.title)
    .bind(&changes.description)
    .bind(&changes.genre)
    .bind(changes.tempo)
    .bind(&changes.mood)
    .bind(time::now_rfc3339())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM rhythm_roulette_compositions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
