//! Public contact form and newsletter signup

use axum::{extract::State, response::IntoResponse, routing::post, Router};
use serde::Deserialize;
use tracing::info;

use super::validation::{self, MIN_CONTACT_MESSAGE_LEN};
use super::{created, ApiJson};
use crate::db::submissions::{self, NewContact};
use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewsletterRequest {
    pub email: Option<String>,
}

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ContactRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();

    let name = validation::require(&mut errors, "name", "Name", &req.name);
    let email = validation::check_email(&mut errors, &req.email);
    let message = validation::require(&mut errors, "message", "Message", &req.message);
    if !message.is_empty() && message.chars().count() < MIN_CONTACT_MESSAGE_LEN {
        errors.add("message", "Message must be at least 10 characters");
    }
    errors.into_result()?;

    let submission = submissions::insert_contact(
        &state.db,
        &NewContact {
            name,
            email,
            company: validation::trimmed(&req.company),
            subject: validation::trimmed(&req.subject),
            message,
        },
    )
    .await?;

    info!(id = submission.id, "Contact form submitted");

    Ok(created("Thank you for contacting us", submission))
}

/// POST /api/newsletter
pub async fn subscribe(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewsletterRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();
    let email = validation::check_email(&mut errors, &req.email).to_lowercase();
    errors.into_result()?;

    match submissions::insert_newsletter(&state.db, &email).await {
        Ok(signup) => {
            info!(id = signup.id, "Newsletter signup");
            Ok(created("Successfully subscribed to the newsletter", signup))
        }
        Err(e) if e.is_unique_violation() => Err(ApiError::Validation(FieldErrors::single(
            "email",
            "This email is already subscribed",
        ))),
        Err(e) => Err(e.into()),
    }
}

pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/api/contact", post(submit_contact))
        .route("/api/newsletter", post(subscribe))
}
