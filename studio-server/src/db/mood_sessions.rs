//! Stored mood detections

use sqlx::SqlitePool;
use studio_common::db::MoodDetectionSession;
use studio_common::{time, Result};

use crate::agents::MoodReading;

pub async fn insert(
    pool: &SqlitePool,
    user_id: i64,
    input_text: &str,
    reading: &MoodReading,
) -> Result<MoodDetectionSession> {
    let row = sqlx::query_as::<_, MoodDetectionSession>(
        r#"
        INSERT INTO mood_detection_sessions
            (user_id, input_text, detected_mood, confidence, energy, valence, description, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, user_id, input_text, detected_mood, confidence, energy, valence, description, created_at
        "#,
    )
    .bind(user_id)
    .bind(input_text)
    .bind(&reading.mood)
    .bind(reading.confidence)
    .bind(reading.energy)
    .bind(reading.valence)
    .bind(&reading.description)
    .bind(time::now_rfc3339())
    .fetch_one(pool)
    .await?;

    Ok(row)
}
