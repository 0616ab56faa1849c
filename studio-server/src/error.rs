//! Error types for studio-server
//!
//! Every error is rendered with the `{success: false, message, errors?}`
//! envelope. Server-side failures are logged here and answered with a
//! generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;

use crate::agents::AgentError;

const GENERIC_FAILURE: &str = "An unexpected error occurred. Please try again later.";
const AGENT_UNAVAILABLE: &str = "Agent unavailable, please try again later";

/// Field name → message, serialized as the `errors` object
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`; the first message per field wins
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> ApiResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Field-level validation failure (400)
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Malformed request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Missing or expired session (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// LLM call failed (500, generic message)
    #[error("Agent unavailable: {0}")]
    AgentUnavailable(#[from] AgentError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// studio-common error
    #[error("Common error: {0}")]
    Common(#[from] studio_common::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Common(studio_common::Error::Database(err))
    }
}

impl From<studio_audio::AudioError> for ApiError {
    fn from(err: studio_audio::AudioError) -> Self {
        match err {
            studio_audio::AudioError::InvalidParameter { name, reason } => {
                ApiError::Validation(FieldErrors::single(name, reason))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(errors),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::AgentUnavailable(AgentError::UnknownAgent(name)) => (
                StatusCode::NOT_FOUND,
                format!("Unknown agent: {}", name),
                None,
            ),
            ApiError::AgentUnavailable(err) => {
                error!("Agent call failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    AGENT_UNAVAILABLE.to_string(),
                    None,
                )
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE.to_string(), None)
            }
            ApiError::Common(err) => {
                error!("Request failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE.to_string(), None)
            }
            ApiError::Other(err) => {
                error!("Request failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE.to_string(), None)
            }
        };

        let body = Json(ErrorBody {
            success: false,
            message,
            errors,
        });

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
