//! Error types for audio generation

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AudioError>;

#[derive(Debug, Error)]
pub enum AudioError {
    /// A generation parameter is outside its accepted range
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// WAV container could not be written
    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl AudioError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        AudioError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
