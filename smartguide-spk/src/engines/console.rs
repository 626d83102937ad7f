//! Console TTS engine: prints utterances instead of speaking them

use crate::config::VoiceConfig;
use crate::engines::TtsEngine;
use crate::error::SpeechError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Prefix written before every utterance.
pub const SPEAKER_PREFIX: &str = "🤖: ";

/// Writes `🤖: text` lines to stdout or a shared writer.
pub struct ConsoleTtsEngine {
    out: Arc<Mutex<dyn Write + Send>>,
}

impl ConsoleTtsEngine {
    pub fn stdout() -> Self {
        Self::with_writer(Arc::new(Mutex::new(std::io::stdout())))
    }

    pub fn with_writer(out: Arc<Mutex<dyn Write + Send>>) -> Self {
        Self { out }
    }
}

#[async_trait]
impl TtsEngine for ConsoleTtsEngine {
    async fn speak(&self, text: &str, _voice: &VoiceConfig) -> Result<(), SpeechError> {
        let mut out = self.out.lock();
        writeln!(out, "{}{}", SPEAKER_PREFIX, text)?;
        out.flush()?;
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "console"
    }
}
