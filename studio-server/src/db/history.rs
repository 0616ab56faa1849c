//! Listening history

use sqlx::SqlitePool;
use studio_common::db::ListeningHistoryEntry;
use studio_common::{time, Result};

const HISTORY_COLUMNS: &str = "id, user_id, track_title, artist, genre, mood, tempo, played_at";

#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub track_title: String,
    pub artist: String,
    pub genre: Option<String>,
    pub mood: Option<String>,
    pub tempo: Option<i64>,
}

/// Most recent plays first
pub async fn list_recent(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> Result<Vec<ListeningHistoryEntry>> {
    let rows = sqlx::query_as::<_, ListeningHistoryEntry>(&format!(
        "SELECT {} FROM listening_history WHERE user_id = ? \
         ORDER BY played_at DESC, id DESC LIMIT ?",
        HISTORY_COLUMNS
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn insert_entry(
    pool: &SqlitePool,
    user_id: i64,
    entry: &NewHistoryEntry,
) -> Result<ListeningHistoryEntry> {
    let row = sqlx::query_as::<_, ListeningHistoryEntry>(&format!(
        "INSERT INTO listening_history (user_id, track_title, artist, genre, mood, tempo, played_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {}",
        HISTORY_COLUMNS
    ))
    .bind(user_id)
    .bind(&entry.track_title)
    .bind(&entry.artist)
    .bind(&entry.genre)
    .bind(&entry.mood)
    .bind(entry.tempo)
    .bind(time::now_rfc3339())
    .fetch_one(pool)
    .await?;

    Ok(row)
}
