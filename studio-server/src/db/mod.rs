//! Query layer for studio-server
//!
//! One module per table group. Functions take the pool (or a transaction)
//! and return rows from [`studio_common::db`].

pub mod compositions;
pub mod creations;
pub mod history;
pub mod mixtapes;
pub mod mood_sessions;
pub mod sessions;
pub mod submissions;
pub mod users;
