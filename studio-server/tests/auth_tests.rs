//! Registration, login, logout and session handling

mod helpers;

use axum::http::StatusCode;
use helpers::{test_app, test_app_with_settings, ScriptedBackend};
use serde_json::json;
use studio_server::ServerSettings;

#[tokio::test]
async fn test_register_logs_in_and_hides_password() {
    let app = test_app(ScriptedBackend::fixed("")).await;

    let response = app
        .post(
            "/api/register",
            json!({
                "username": "dj_nova",
                "email": "nova@example.com",
                "password": "secret123",
                "fullName": "Nova Reyes"
            }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let body = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], "dj_nova");
    assert_eq!(body["data"]["fullName"], "Nova Reyes");
    assert!(body["data"].get("password").is_none());

    let set_cookie = response.set_cookie().unwrap();
    assert!(set_cookie.starts_with("studio.sid="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=604800"));
    assert!(!set_cookie.contains("Secure"));

    let cookie = response.session_cookie().unwrap();
    let me = app.get("/api/user", Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.json()["data"]["email"], "nova@example.com");
    assert!(me.json()["data"].get("password").is_none());

    let stored: String = sqlx::query_scalar("SELECT password FROM users WHERE username = 'dj_nova'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_ne!(stored, "secret123");
    assert_eq!(stored.split('.').count(), 2);
}

#[tokio::test]
async fn test_register_validation_is_field_keyed() {
    let app = test_app(ScriptedBackend::fixed("")).await;

    let response = app
        .post(
            "/api/register",
            json!({
                "username": "x!",
                "email": "not-an-email",
                "password": "short",
                "fullName": "a".repeat(101)
            }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let errors = &response.json()["errors"];
    for field in ["username", "email", "password", "fullName"] {
        assert!(errors[field].is_string(), "expected error for {}", field);
    }
}

#[tokio::test]
async fn test_password_needs_letter_and_digit() {
    let app = test_app(ScriptedBackend::fixed("")).await;

    for password in ["allletters", "12345678"] {
        let response = app
            .post(
                "/api/register",
                json!({"username": "beatsmith", "email": "b@example.com", "password": password}),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.json()["errors"]["password"].is_string());
    }
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let app = test_app(ScriptedBackend::fixed("")).await;
    app.register("kairo_fan").await;

    let response = app
        .post(
            "/api/register",
            json!({"username": "kairo_fan", "email": "other@example.com", "password": "secret123"}),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["errors"]["username"],
        "Username already exists"
    );
}

#[tokio::test]
async fn test_login_flow() {
    let app = test_app(ScriptedBackend::fixed("")).await;
    app.register("loop_queen").await;

    let bad = app
        .post(
            "/api/login",
            json!({"username": "loop_queen", "password": "wrongpass1"}),
            None,
        )
        .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad.json()["success"], false);

    let unknown = app
        .post(
            "/api/login",
            json!({"username": "nobody", "password": "secret123"}),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);

    let missing = app
        .post("/api/login", json!({"username": "loop_queen"}), None)
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let good = app
        .post(
            "/api/login",
            json!({"username": "loop_queen", "password": "secret123", "rememberMe": true}),
            None,
        )
        .await;
    assert_eq!(good.status, StatusCode::OK);
    assert!(good.set_cookie().unwrap().contains("Max-Age=2592000"));
    assert_eq!(good.json()["data"]["username"], "loop_queen");
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = test_app(ScriptedBackend::fixed("")).await;
    let cookie = app.register("fader").await;

    let response = app
        .request(axum::http::Method::POST, "/api/logout", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.set_cookie().unwrap().contains("Max-Age=0"));

    let me = app.get("/api/user", Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_requires_session() {
    let app = test_app(ScriptedBackend::fixed("")).await;

    assert_eq!(app.get("/api/user", None).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        app.get("/api/user", Some("studio.sid=feedface")).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_expired_session_is_rejected_and_removed() {
    let app = test_app(ScriptedBackend::fixed("")).await;
    let cookie = app.register("old_timer").await;
    let sid = cookie.trim_start_matches("studio.sid=").to_string();

    sqlx::query("UPDATE sessions SET expires_at = '2000-01-01T00:00:00.000000Z' WHERE sid = ?")
        .bind(&sid)
        .execute(&app.pool)
        .await
        .unwrap();

    assert_eq!(
        app.get("/api/user", Some(&cookie)).await.status,
        StatusCode::UNAUTHORIZED
    );

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE sid = ?")
        .bind(&sid)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn test_login_purges_expired_sessions() {
    let app = test_app(ScriptedBackend::fixed("")).await;
    app.register("sweeper").await;

    sqlx::query("UPDATE sessions SET expires_at = '2000-01-01T00:00:00.000000Z'")
        .execute(&app.pool)
        .await
        .unwrap();

    let response = app
        .post(
            "/api/login",
            json!({"username": "sweeper", "password": "secret123"}),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_production_cookies_are_secure() {
    let app = test_app_with_settings(
        ScriptedBackend::fixed(""),
        ServerSettings {
            secure_cookies: true,
            static_dir: None,
        },
    )
    .await;

    let response = app
        .post(
            "/api/register",
            json!({"username": "prod_user", "email": "p@example.com", "password": "secret123"}),
            None,
        )
        .await;
    assert!(response.set_cookie().unwrap().contains("Secure"));
}
