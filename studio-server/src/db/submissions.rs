//! Contact form and newsletter rows

use sqlx::SqlitePool;
use studio_common::db::{ContactSubmission, NewsletterSignup};
use studio_common::{time, Result};

#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

pub async fn insert_contact(pool: &SqlitePool, contact: &NewContact) -> Result<ContactSubmission> {
    let row = sqlx::query_as::<_, ContactSubmission>(
        r#"
        INSERT INTO contact_submissions (name, email, company, subject, message, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, name, email, company, subject, message, created_at
        "#,
    )
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.company)
    .bind(&contact.subject)
    .bind(&contact.message)
    .bind(time::now_rfc3339())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Insert a signup. A duplicate email surfaces as a unique violation
/// (see [`studio_common::Error::is_unique_violation`]).
pub async fn insert_newsletter(pool: &SqlitePool, email: &str) -> Result<NewsletterSignup> {
    let row = sqlx::query_as::<_, NewsletterSignup>(
        "INSERT INTO newsletter_signups (email, created_at) VALUES (?, ?) RETURNING id, email, created_at",
    )
    .bind(email)
    .bind(time::now_rfc3339())
    .fetch_one(pool)
    .await?;

    Ok(row)
}
