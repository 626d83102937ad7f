//! Error types for smartguide-session

use smartguide_core::{ConfigError, Error as CoreError};
use smartguide_eye::VisionError;
use smartguide_spk::SpeechError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dialogue error: {0}")]
    Dialogue(String),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Vision(#[from] VisionError),

    #[error(transparent)]
    Speech(#[from] SpeechError),
}

impl From<SessionError> for CoreError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Config(e) => CoreError::Configuration(e.to_string()),
            SessionError::Vision(e) => e.into(),
            SessionError::Speech(e) => e.into(),
            SessionError::Url(e) => CoreError::Navigation(e.to_string()),
            SessionError::Navigation(msg) => CoreError::Navigation(msg),
            SessionError::Dialogue(msg) => CoreError::Speech(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
