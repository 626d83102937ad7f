//! The voice interface: everything the assistant says and hears goes through here

use crate::config::SpeechConfig;
use crate::engines::{engine_from_config, TtsEngine};
use crate::error::SpeechError;
use crate::recognition::Recognition;
use crate::recognizer::SpeechRecognizer;
use crate::transcript::{Speaker, Transcript};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum utterance size in bytes.
pub const MAX_TEXT_BYTES: usize = 100_000;

/// Prompt spoken by `listen` when the caller has none.
pub const DEFAULT_LISTEN_PROMPT: &str = "請開始說話";

/// Spoken output and listening, as seen by the dialogue and narration loop.
#[async_trait]
pub trait SpeechSink: Send + Sync {
    /// Speak `text`, returning once it has been fully spoken.
    async fn say(&self, text: &str) -> Result<(), SpeechError>;

    /// Speak `prompt`, then capture one answer. Failures are reported as
    /// [`Recognition::NotUnderstood`].
    async fn listen(&self, prompt: &str) -> Recognition;
}

/// Check and clean text before it reaches an engine.
///
/// Rejects empty text, NUL bytes and anything over [`MAX_TEXT_BYTES`];
/// other control characters become spaces.
pub fn sanitize_text(text: &str) -> Result<String, SpeechError> {
    if text.len() > MAX_TEXT_BYTES {
        return Err(SpeechError::InvalidText(format!(
            "Text too long ({} bytes, max {})",
            text.len(),
            MAX_TEXT_BYTES
        )));
    }
    if text.contains('\0') {
        return Err(SpeechError::InvalidText("Text contains null bytes".to_string()));
    }

    let cleaned: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(SpeechError::InvalidText("Text cannot be empty".to_string()));
    }
    Ok(cleaned.to_string())
}

/// TTS engine plus recognizer with a shared transcript.
pub struct VoiceInterface {
    config: Arc<SpeechConfig>,
    engine: Arc<dyn TtsEngine>,
    recognizer: Arc<dyn SpeechRecognizer>,
    transcript: RwLock<Transcript>,
}

impl VoiceInterface {
    pub fn new(
        config: SpeechConfig,
        engine: Arc<dyn TtsEngine>,
        recognizer: Arc<dyn SpeechRecognizer>,
    ) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;

        info!(
            "Voice interface ready (engine: {}, recognizer: {}, enabled: {})",
            engine.name(),
            recognizer.name(),
            config.enabled
        );

        Ok(Self {
            transcript: RwLock::new(Transcript::new(config.transcript_capacity)),
            config: Arc::new(config),
            engine,
            recognizer,
        })
    }

    /// Build with the engine named in `config`.
    pub fn from_config(
        config: SpeechConfig,
        recognizer: Arc<dyn SpeechRecognizer>,
    ) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;
        let engine = engine_from_config(&config)?;
        Self::new(config, engine, recognizer)
    }

    pub fn config(&self) -> &SpeechConfig {
        &self.config
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Snapshot of the transcript.
    pub fn transcript(&self) -> Transcript {
        self.transcript.read().clone()
    }

    pub fn spoken_lines(&self) -> Vec<String> {
        self.transcript.read().lines(Speaker::Guide)
    }

    pub fn heard_lines(&self) -> Vec<String> {
        self.transcript.read().lines(Speaker::User)
    }
}

#[async_trait]
impl SpeechSink for VoiceInterface {
    async fn say(&self, text: &str) -> Result<(), SpeechError> {
        let text = sanitize_text(text)?;

        if self.config.enabled {
            self.engine.speak(&text, &self.config.voice).await?;
        } else {
            debug!("Speech disabled, not speaking: {}", text);
        }

        info!("Said: {}", text);
        self.transcript.write().record(Speaker::Guide, text);
        Ok(())
    }

    async fn listen(&self, prompt: &str) -> Recognition {
        let prompt = if prompt.trim().is_empty() {
            DEFAULT_LISTEN_PROMPT
        } else {
            prompt
        };
        if let Err(e) = self.say(prompt).await {
            warn!("Failed to speak prompt: {}", e);
        }

        let recognition = match self.recognizer.recognize().await {
            Ok(recognition) => recognition,
            Err(e) => {
                warn!("Recognition failed: {}", e);
                Recognition::NotUnderstood
            }
        };

        match &recognition {
            Recognition::Heard(text) => {
                info!("Heard: {}", text);
                self.transcript.write().record(Speaker::User, text.clone());
            }
            Recognition::NotUnderstood => debug!("Nothing understood"),
        }
        recognition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::CustomTtsEngine;
    use crate::recognizer::ScriptedRecognizer;
    use parking_lot::Mutex;

    fn recording_voice(
        config: SpeechConfig,
        answers: &[&str],
    ) -> (VoiceInterface, Arc<Mutex<Vec<String>>>) {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let sink = spoken.clone();
        let engine = CustomTtsEngine::from_fn("recorder", move |text, _| {
            sink.lock().push(text.to_string());
            Ok(())
        });
        let recognizer = ScriptedRecognizer::new(answers.iter().copied());
        let voice = VoiceInterface::new(config, Arc::new(engine), Arc::new(recognizer)).unwrap();
        (voice, spoken)
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text(" 中間有人\n").unwrap(), "中間有人");
        assert_eq!(sanitize_text("a\tb").unwrap(), "a b");
        assert!(sanitize_text("").is_err());
        assert!(sanitize_text("\n\r").is_err());
        assert!(sanitize_text("a\0b").is_err());
        assert!(sanitize_text(&"字".repeat(40_000)).is_err());
    }

    #[tokio::test]
    async fn test_say_records_transcript() {
        let (voice, spoken) = recording_voice(SpeechConfig::default(), &[]);
        voice.say("左邊有椅子").await.unwrap();

        assert_eq!(*spoken.lock(), vec!["左邊有椅子".to_string()]);
        assert_eq!(voice.spoken_lines(), vec!["左邊有椅子".to_string()]);
    }

    #[tokio::test]
    async fn test_disabled_speech_only_records() {
        let mut config = SpeechConfig::default();
        config.enabled = false;
        let (voice, spoken) = recording_voice(config, &[]);

        voice.say("右邊有狗").await.unwrap();
        assert!(spoken.lock().is_empty());
        assert_eq!(voice.spoken_lines(), vec!["右邊有狗".to_string()]);
    }

    #[tokio::test]
    async fn test_listen_speaks_prompt_then_hears() {
        let (voice, spoken) = recording_voice(SpeechConfig::default(), &["台北車站"]);

        let heard = voice.listen("請問今天想要去哪裡？").await;
        assert_eq!(heard, Recognition::Heard("台北車站".to_string()));
        assert_eq!(*spoken.lock(), vec!["請問今天想要去哪裡？".to_string()]);
        assert_eq!(voice.heard_lines(), vec!["台北車站".to_string()]);
    }

    #[tokio::test]
    async fn test_listen_uses_default_prompt() {
        let (voice, spoken) = recording_voice(SpeechConfig::default(), &[]);
        assert_eq!(voice.listen("").await, Recognition::NotUnderstood);
        assert_eq!(*spoken.lock(), vec![DEFAULT_LISTEN_PROMPT.to_string()]);
        assert!(voice.heard_lines().is_empty());
    }

    #[tokio::test]
    async fn test_engine_failure_surfaces_from_say() {
        let engine = CustomTtsEngine::from_fn("broken", |_, _| {
            Err(SpeechError::Engine("audio device busy".to_string()))
        });
        let voice = VoiceInterface::new(
            SpeechConfig::default(),
            Arc::new(engine),
            Arc::new(ScriptedRecognizer::new(["捷運"])),
        )
        .unwrap();

        assert!(voice.say("你好").await.is_err());
        assert!(voice.spoken_lines().is_empty());
        // Prompt failure does not prevent listening
        assert_eq!(voice.listen("請說").await, Recognition::Heard("捷運".to_string()));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SpeechConfig::default();
        config.rate = 900;
        let result = VoiceInterface::new(
            config,
            Arc::new(CustomTtsEngine::from_fn("x", |_, _| Ok(()))),
            Arc::new(ScriptedRecognizer::default()),
        );
        assert!(matches!(result, Err(SpeechError::Config(_))));
    }
}
