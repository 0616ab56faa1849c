//! studio-server library interface
//!
//! Exposes the router and application state so integration tests can drive
//! the full HTTP surface against an in-memory database.

pub mod agents;
pub mod api;
pub mod auth;
pub mod db;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::agents::AgentHub;

/// Settings handlers need at request time
#[derive(Debug, Clone, Default)]
pub struct ServerSettings {
    /// Adds `Secure` to session cookies
    pub secure_cookies: bool,
    /// Built frontend served for non-API paths
    pub static_dir: Option<PathBuf>,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub agents: AgentHub,
    pub settings: Arc<ServerSettings>,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, agents: AgentHub, settings: ServerSettings) -> Self {
        Self {
            db,
            agents,
            settings: Arc::new(settings),
            startup_time: Utc::now(),
        }
    }
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let static_dir = state
        .settings
        .static_dir
        .clone()
        .filter(|dir| dir.is_dir());

    let router = Router::new()
        .merge(api::health_routes())
        .merge(api::auth_routes())
        .merge(api::contact_routes())
        .merge(api::creation_routes())
        .merge(api::history_routes())
        .merge(api::roulette_routes())
        .merge(api::mood_routes())
        .merge(api::agent_routes())
        .merge(api::audio_routes())
        .with_state(state);

    // Unknown paths fall through to the single-page app's index.html
    let router = match static_dir {
        Some(dir) => {
            let index = dir.join("index.html");
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => router.fallback(route_not_found),
    };

    router.layer(TraceLayer::new_for_http())
}
