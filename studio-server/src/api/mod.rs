//! HTTP API handlers
//!
//! Every response uses the `{success, message?, data?}` envelope; errors
//! go through [`crate::ApiError`].

pub mod agents;
pub mod audio;
pub mod auth;
pub mod contact;
pub mod creations;
pub mod health;
pub mod history;
pub mod mood;
pub mod roulette;
pub mod validation;

pub use agents::agent_routes;
pub use audio::audio_routes;
pub use auth::auth_routes;
pub use contact::contact_routes;
pub use creations::creation_routes;
pub use health::health_routes;
pub use history::history_routes;
pub use mood::mood_routes;
pub use roulette::roulette_routes;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{ApiError, ApiResult};

/// Success envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 200 with data
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        message: None,
        data: Some(data),
    })
}

/// 200 with only a message
pub fn ok_message(message: &str) -> Json<Envelope<()>> {
    Json(Envelope {
        success: true,
        message: Some(message.to_string()),
        data: None,
    })
}

/// 201 with message and data
pub fn created<T: Serialize>(message: &str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::CREATED,
        Json(Envelope {
            success: true,
            message: Some(message.to_string()),
            data: Some(data),
        }),
    )
}

/// JSON body extractor whose rejection uses the error envelope
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}

/// JSON body that may be omitted; an empty body yields `T::default()`
pub struct OptionalJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJson(T::default()));
        }

        serde_json::from_slice(&body)
            .map(OptionalJson)
            .map_err(|e| {
                ApiError::BadRequest(format!("Failed to parse the request body as JSON: {}", e))
            })
    }
}

/// 404 for a missing row, 403 for someone else's
pub fn check_owner<T>(
    row: Option<T>,
    owner_of: impl Fn(&T) -> i64,
    user_id: i64,
    what: &str,
) -> ApiResult<T> {
    let row = row.ok_or_else(|| ApiError::NotFound(format!("{} not found", what)))?;
    if owner_of(&row) != user_id {
        return Err(ApiError::Forbidden(format!(
            "You do not have access to this {}",
            what.to_lowercase()
        )));
    }
    Ok(row)
}
