//! Login sessions
//!
//! Expiry is stored as sortable RFC 3339 text, so expired rows can be
//! selected with a plain string comparison.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use studio_common::db::Session;
use studio_common::{time, Result};
use tracing::debug;

pub async fn insert_session(
    pool: &SqlitePool,
    sid: &str,
    user_id: i64,
    expires_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query("INSERT INTO sessions (sid, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)")
        .bind(sid)
        .bind(user_id)
        .bind(time::to_rfc3339(expires_at))
        .bind(time::now_rfc3339())
        .execute(pool)
        .await?;

    Ok(())
}

/// Look up a session that has not expired yet.
///
/// An expired row is deleted on the way out.
pub async fn find_active(pool: &SqlitePool, sid: &str) -> Result<Option<Session>> {
    let session = sqlx::query_as::<_, Session>(
        "SELECT sid, user_id, expires_at, created_at FROM sessions WHERE sid = ?",
    )
    .bind(sid)
    .fetch_optional(pool)
    .await?;

    let Some(session) = session else {
        return Ok(None);
    };

    if time::parse_rfc3339(&session.expires_at)? <= time::now() {
        debug!(user_id = session.user_id, "Dropping expired session");
        delete_session(pool, sid).await?;
        return Ok(None);
    }

    Ok(Some(session))
}

pub async fn delete_session(pool: &SqlitePool, sid: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE sid = ?")
        .bind(sid)
        .execute(pool)
        .await?;

    Ok(())
}

/// Remove every expired session; returns the number removed
pub async fn purge_expired(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(time::now_rfc3339())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
