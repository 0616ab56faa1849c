//! # Studio Common Library
//!
//! Shared code for the studio backend crates:
//! - Database initialization and row models
//! - Configuration loading (CLI / ENV / TOML / compiled defaults)
//! - Common error type
//! - Timestamp helpers

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
