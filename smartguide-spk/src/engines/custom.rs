//! Custom TTS engine implementation
//! Allows callers to plug in their own speech output

use crate::config::VoiceConfig;
use crate::engines::TtsEngine;
use crate::error::SpeechError;
use async_trait::async_trait;
use std::sync::Arc;

type SpeakFn = Arc<dyn Fn(&str, &VoiceConfig) -> Result<(), SpeechError> + Send + Sync>;

/// Custom TTS engine wrapper
pub struct CustomTtsEngine {
    name: String,
    speak_fn: SpeakFn,
    is_available_fn: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl CustomTtsEngine {
    pub fn new<F1, F2>(name: impl Into<String>, speak_fn: F1, is_available_fn: F2) -> Self
    where
        F1: Fn(&str, &VoiceConfig) -> Result<(), SpeechError> + Send + Sync + 'static,
        F2: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            speak_fn: Arc::new(speak_fn),
            is_available_fn: Arc::new(is_available_fn),
        }
    }

    /// Always-available engine backed by `speak_fn`.
    pub fn from_fn<F>(name: impl Into<String>, speak_fn: F) -> Self
    where
        F: Fn(&str, &VoiceConfig) -> Result<(), SpeechError> + Send + Sync + 'static,
    {
        Self::new(name, speak_fn, || true)
    }
}

#[async_trait]
impl TtsEngine for CustomTtsEngine {
    async fn speak(&self, text: &str, voice: &VoiceConfig) -> Result<(), SpeechError> {
        if !self.is_available() {
            return Err(SpeechError::Engine(format!("Engine '{}' not available", self.name)));
        }
        (self.speak_fn)(text, voice)
    }

    fn is_available(&self) -> bool {
        (self.is_available_fn)()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
