//! Health check, static frontend and fallback routing

mod helpers;

use axum::http::StatusCode;
use helpers::{test_app, test_app_with_settings, ScriptedBackend};
use studio_server::ServerSettings;

#[tokio::test]
async fn test_health() {
    let app = test_app(ScriptedBackend::fixed("")).await;

    let response = app.get("/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "studio-server");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_unknown_route_without_frontend() {
    let app = test_app(ScriptedBackend::fixed("")).await;

    let response = app.get("/api/does-not-exist", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["success"], false);
}

#[tokio::test]
async fn test_static_frontend_with_spa_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>studio</html>").unwrap();
    std::fs::create_dir(dir.path().join("assets")).unwrap();
    std::fs::write(dir.path().join("assets").join("app.js"), "console.log(1)").unwrap();

    let app = test_app_with_settings(
        ScriptedBackend::fixed(""),
        ServerSettings {
            secure_cookies: false,
            static_dir: Some(dir.path().to_path_buf()),
        },
    )
    .await;

    let asset = app.get("/assets/app.js", None).await;
    assert_eq!(asset.status, StatusCode::OK);
    assert_eq!(asset.bytes, b"console.log(1)");

    let client_route = app.get("/dashboard/mixtapes", None).await;
    assert_eq!(client_route.status, StatusCode::OK);
    assert_eq!(client_route.bytes, b"<html>studio</html>");

    // API routes still win over the frontend
    assert_eq!(app.get("/health", None).await.status, StatusCode::OK);
}
