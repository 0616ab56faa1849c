//! Cookie-backed login sessions

use axum::http::{header, HeaderMap};
use rand::RngCore;
use sqlx::SqlitePool;
use studio_common::time;
use tracing::debug;

use super::to_hex;
use crate::db::sessions;
use crate::error::ApiResult;

pub const SESSION_COOKIE: &str = "studio.sid";

const SESSION_ID_BYTES: usize = 32;
const DEFAULT_SESSION_DAYS: i64 = 7;
const REMEMBER_ME_DAYS: i64 = 30;

fn new_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    to_hex(&bytes)
}

fn build_cookie(value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, value, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Create a session row for `user_id` and return the `Set-Cookie` value.
///
/// Expired sessions of every user are purged first.
pub async fn start_session(
    pool: &SqlitePool,
    user_id: i64,
    remember_me: bool,
    secure: bool,
) -> ApiResult<String> {
    let purged = sessions::purge_expired(pool).await?;
    if purged > 0 {
        debug!(purged, "Purged expired sessions");
    }

    let days = if remember_me {
        REMEMBER_ME_DAYS
    } else {
        DEFAULT_SESSION_DAYS
    };
    let sid = new_session_id();
    sessions::insert_session(pool, &sid, user_id, time::days_from_now(days)).await?;

    Ok(build_cookie(&sid, days * 24 * 60 * 60, secure))
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(secure: bool) -> String {
    build_cookie("", 0, secure)
}

/// Session id from the request's `Cookie` headers
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
