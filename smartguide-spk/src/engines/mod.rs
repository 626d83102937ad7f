//! TTS engine implementations

pub mod console;
pub mod custom;
pub mod native;

use crate::config::{EngineKind, SpeechConfig, VoiceConfig};
use crate::error::SpeechError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub use console::ConsoleTtsEngine;
pub use custom::CustomTtsEngine;
pub use native::NativeTtsEngine;

/// Trait for TTS engines
#[async_trait]
pub trait TtsEngine: Send + Sync {
    /// Speak `text` and return once playback has finished.
    async fn speak(&self, text: &str, voice: &VoiceConfig) -> Result<(), SpeechError>;

    /// Get available voices
    async fn list_voices(&self) -> Result<Vec<String>, SpeechError> {
        Ok(vec![])
    }

    /// Check if engine is available
    fn is_available(&self) -> bool;

    /// Get engine name
    fn name(&self) -> &str;
}

/// Build the engine selected in `config`.
pub fn engine_from_config(config: &SpeechConfig) -> Result<Arc<dyn TtsEngine>, SpeechError> {
    let engine: Arc<dyn TtsEngine> = match config.engine {
        EngineKind::Native => {
            let engine = NativeTtsEngine::new_with_config(config.rate, config.volume, config.pitch);
            if !engine.is_available() {
                return Err(SpeechError::Engine("Native TTS engine not available".to_string()));
            }
            Arc::new(engine)
        }
        EngineKind::Console => Arc::new(ConsoleTtsEngine::stdout()),
    };
    info!("Using {} TTS engine", engine.name());
    Ok(engine)
}
