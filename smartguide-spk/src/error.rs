//! Error types for smartguide-spk

use smartguide_core::Error as CoreError;
use thiserror::Error;

/// Speech errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Invalid text: {0}")]
    InvalidText(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SpeechError> for CoreError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Config(msg) => CoreError::Configuration(msg),
            SpeechError::Io(e) => CoreError::Io(e),
            other => CoreError::Speech(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_core_error() {
        let core: CoreError = SpeechError::Engine("espeak-ng missing".to_string()).into();
        assert!(matches!(core, CoreError::Speech(ref m) if m.contains("espeak-ng missing")));

        let core: CoreError = SpeechError::Config("bad rate".to_string()).into();
        assert!(matches!(core, CoreError::Configuration(_)));
    }
}
