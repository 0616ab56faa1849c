//! Tests for database initialization
//!
//! - Database file is created when missing
//! - Re-opening an existing database is safe
//! - Every table exists after initialization

use studio_common::db::init::{init_database, init_memory_database};

const EXPECTED_TABLES: &[&str] = &[
    "users",
    "sessions",
    "contact_submissions",
    "newsletter_signups",
    "user_beats",
    "user_avatars",
    "user_voice_samples",
    "listening_history",
    "rhythm_roulette_compositions",
    "mood_mixtapes",
    "mood_detection_sessions",
];

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("studio.db");

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("studio.db");

    let pool1 = init_database(&db_path).await.unwrap();
    sqlx::query("INSERT INTO newsletter_signups (email, created_at) VALUES ('a@b.co', 'now')")
        .execute(&pool1)
        .await
        .unwrap();
    pool1.close().await;

    let pool2 = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM newsletter_signups")
        .fetch_one(&pool2)
        .await
        .unwrap();
    assert_eq!(count, 1, "Existing rows must survive re-initialization");
}

#[tokio::test]
async fn test_all_tables_created() {
    let pool = init_memory_database().await.unwrap();

    for table in EXPECTED_TABLES {
        let exists: Option<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(table)
                .fetch_optional(&pool)
                .await
                .unwrap();
        assert!(exists.is_some(), "Table '{}' should exist", table);
    }
}

#[tokio::test]
async fn test_username_uniqueness_enforced() {
    let pool = init_memory_database().await.unwrap();

    let insert = "INSERT INTO users (username, email, password, created_at) VALUES ('kai', 'k@x.io', 'h.s', 'now')";
    sqlx::query(insert).execute(&pool).await.unwrap();

    let err = sqlx::query(insert).execute(&pool).await.unwrap_err();
    let err = studio_common::Error::from(err);
    assert!(err.is_unique_violation());
}
