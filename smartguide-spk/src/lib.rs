//! smartguide-spk: the assistant's voice
//!
//! Provides:
//! - Text-to-speech engines (native platform TTS, console, custom)
//! - Speech recognizers (console line input, scripted answers)
//! - [`VoiceInterface`], the [`SpeechSink`] used by dialogue and narration,
//!   which validates text and keeps a bounded transcript

pub mod config;
pub mod engines;
pub mod error;
pub mod recognition;
pub mod recognizer;
pub mod transcript;
pub mod voice;

pub use config::{EngineKind, SpeechConfig, VoiceConfig};
pub use engines::TtsEngine;
pub use error::SpeechError;
pub use recognition::{Recognition, NOT_UNDERSTOOD_REPLY};
pub use recognizer::{ConsoleRecognizer, ScriptedRecognizer, SpeechRecognizer};
pub use transcript::{Speaker, Transcript, TranscriptEntry};
pub use voice::{sanitize_text, SpeechSink, VoiceInterface};
