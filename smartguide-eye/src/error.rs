//! Error types for smartguide-eye

use smartguide_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Camera error: {0}")]
    Camera(String),

    #[error("Detection error: {0}")]
    Detection(String),

    #[error("Invalid bounding box: {0}")]
    InvalidBox(String),

    #[error("Scene error: {0}")]
    Scene(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Font error: {0}")]
    Font(String),
}

impl From<VisionError> for CoreError {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::Camera(msg) => CoreError::Capture(msg),
            VisionError::Config(msg) => CoreError::Configuration(msg),
            VisionError::Io(e) => CoreError::Io(e),
            other => CoreError::Detection(other.to_string()),
        }
    }
}
