//! Native platform TTS engine
//!
//! Drives the platform's command line synthesizer and waits for playback to
//! finish: `espeak-ng` on Linux, `say` on macOS and `System.Speech` through
//! PowerShell on Windows.

use crate::config::VoiceConfig;
use crate::engines::TtsEngine;
use crate::error::SpeechError;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Native TTS engine (platform-specific)
pub struct NativeTtsEngine {
    available: bool,
    rate: u32,
    volume: f32,
    pitch: f32,
}

#[async_trait]
impl TtsEngine for NativeTtsEngine {
    async fn speak(&self, text: &str, voice: &VoiceConfig) -> Result<(), SpeechError> {
        if !self.available {
            return Err(SpeechError::Engine("Native TTS engine not available".to_string()));
        }
        if text.is_empty() {
            return Err(SpeechError::InvalidText("Text cannot be empty".to_string()));
        }
        debug!("Speaking {} chars natively", text.chars().count());
        platform::speak(text, voice, self.rate, self.volume, self.pitch).await
    }

    async fn list_voices(&self) -> Result<Vec<String>, SpeechError> {
        if !self.available {
            return Ok(vec![]);
        }
        platform::list_voices().await
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &str {
        "native"
    }
}

impl NativeTtsEngine {
    pub fn new() -> Self {
        Self::new_with_config(150, 0.8, 0.0)
    }

    pub fn new_with_config(rate: u32, volume: f32, pitch: f32) -> Self {
        let available = platform::probe();
        if available {
            info!("Native TTS engine initialized ({})", platform::TOOL);
        } else {
            warn!("Native TTS unavailable: {} not found", platform::TOOL);
        }
        Self {
            available,
            rate,
            volume,
            pitch,
        }
    }
}

impl Default for NativeTtsEngine {
    fn default() -> Self {
        Self::new()
    }
}

async fn run(mut cmd: tokio::process::Command, tool: &str) -> Result<(), SpeechError> {
    let output = cmd
        .output()
        .await
        .map_err(|e| SpeechError::Engine(format!("Failed to run {}: {}", tool, e)))?;

    if !output.status.success() {
        return Err(SpeechError::Engine(format!(
            "{} failed: {}",
            tool,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}

/// espeak-ng voice for a language code; Mandarin variants map to `cmn`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn espeak_voice(voice: &VoiceConfig) -> String {
    if let Some(ref name) = voice.name {
        return name.clone();
    }
    let language = voice.language.to_ascii_lowercase();
    if language == "zh" || language.starts_with("zh-") {
        "cmn".to_string()
    } else {
        language
    }
}

#[cfg(target_os = "linux")]
mod platform {
    use super::*;

    pub const TOOL: &str = "espeak-ng";

    pub fn probe() -> bool {
        std::process::Command::new(TOOL)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    pub async fn speak(
        text: &str,
        voice: &VoiceConfig,
        rate: u32,
        volume: f32,
        pitch: f32,
    ) -> Result<(), SpeechError> {
        let mut cmd = tokio::process::Command::new(TOOL);

        cmd.arg("-v").arg(espeak_voice(voice));

        // Speed in words per minute
        cmd.arg("-s").arg(rate.to_string());

        // Amplitude 0-200, 100 is normal
        let amplitude = ((volume * 200.0).round() as u32).min(200);
        cmd.arg("-a").arg(amplitude.to_string());

        // Pitch 0-99, 50 is normal
        let espeak_pitch = ((50.0 + (pitch * 49.0)).round() as u32).min(99);
        cmd.arg("-p").arg(espeak_pitch.to_string());

        // `--` so text starting with '-' is not taken as an option
        cmd.arg("--").arg(text);

        run(cmd, TOOL).await
    }

    pub async fn list_voices() -> Result<Vec<String>, SpeechError> {
        let output = tokio::process::Command::new(TOOL)
            .arg("--voices")
            .output()
            .await
            .map_err(|e| SpeechError::Engine(format!("Failed to list voices: {}", e)))?;

        if !output.status.success() {
            return Ok(vec![]);
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .skip(1)
            .filter_map(|line| line.split_whitespace().nth(1).map(str::to_string))
            .filter(|voice| voice.len() <= 256)
            .take(1000)
            .collect())
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use super::*;

    pub const TOOL: &str = "say";

    pub fn probe() -> bool {
        std::path::Path::new("/usr/bin/say").exists()
    }

    pub async fn speak(
        text: &str,
        voice: &VoiceConfig,
        rate: u32,
        _volume: f32,
        _pitch: f32,
    ) -> Result<(), SpeechError> {
        let mut cmd = tokio::process::Command::new(TOOL);

        if let Some(ref name) = voice.name {
            let sanitized: String = name
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
                .take(256)
                .collect();
            if !sanitized.is_empty() {
                cmd.arg("-v").arg(sanitized);
            }
        }

        // say has no volume or pitch flags
        cmd.arg("-r").arg(rate.min(500).to_string());
        cmd.arg("--").arg(text);

        run(cmd, TOOL).await
    }

    pub async fn list_voices() -> Result<Vec<String>, SpeechError> {
        let output = tokio::process::Command::new(TOOL)
            .arg("-v")
            .arg("?")
            .output()
            .await
            .map_err(|e| SpeechError::Engine(format!("Failed to list voices: {}", e)))?;

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(|line| line.split_whitespace().next().map(str::to_string))
            .take(1000)
            .collect())
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use super::*;

    pub const TOOL: &str = "powershell";

    pub fn probe() -> bool {
        true
    }

    /// Escape for a single-quoted PowerShell string.
    fn quote(s: &str) -> String {
        s.chars()
            .map(|c| match c {
                '\'' => "''".to_string(),
                '\n' | '\r' => " ".to_string(),
                _ => c.to_string(),
            })
            .collect()
    }

    pub async fn speak(
        text: &str,
        voice: &VoiceConfig,
        rate: u32,
        volume: f32,
        _pitch: f32,
    ) -> Result<(), SpeechError> {
        let voice_arg = match voice.name {
            Some(ref name) => format!("$synth.SelectVoice('{}'); ", quote(name)),
            None => String::new(),
        };

        // SpeechSynthesizer.Rate is -10..10 with 0 at roughly 250 WPM
        let synth_rate = ((rate as f32 - 250.0) / 25.0).round().clamp(-10.0, 10.0) as i32;
        let synth_volume = ((volume * 100.0).round() as u32).min(100);

        let script = format!(
            "Add-Type -AssemblyName System.Speech; \
             $synth = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
             {}$synth.Rate = {}; $synth.Volume = {}; \
             $synth.Speak('{}'); $synth.Dispose()",
            voice_arg,
            synth_rate,
            synth_volume,
            quote(text)
        );

        let mut cmd = tokio::process::Command::new(TOOL);
        cmd.arg("-NoProfile")
            .arg("-NonInteractive")
            .arg("-ExecutionPolicy")
            .arg("Bypass")
            .arg("-Command")
            .arg(script);

        run(cmd, TOOL).await
    }

    pub async fn list_voices() -> Result<Vec<String>, SpeechError> {
        Ok(vec![
            "Microsoft Hanhan Desktop".to_string(),
            "Microsoft Zira Desktop".to_string(),
        ])
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod platform {
    use super::*;

    pub const TOOL: &str = "native TTS";

    pub fn probe() -> bool {
        false
    }

    pub async fn speak(
        _text: &str,
        _voice: &VoiceConfig,
        _rate: u32,
        _volume: f32,
        _pitch: f32,
    ) -> Result<(), SpeechError> {
        Err(SpeechError::Engine("Native TTS not supported on this platform".to_string()))
    }

    pub async fn list_voices() -> Result<Vec<String>, SpeechError> {
        Ok(vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_espeak_voice_mapping() {
        let mut voice = VoiceConfig::default();
        assert_eq!(espeak_voice(&voice), "cmn");

        voice.language = "en-US".to_string();
        assert_eq!(espeak_voice(&voice), "en-us");

        voice.name = Some("cmn-latn-pinyin".to_string());
        assert_eq!(espeak_voice(&voice), "cmn-latn-pinyin");
    }

    #[tokio::test]
    async fn test_unavailable_engine_refuses() {
        let engine = NativeTtsEngine {
            available: false,
            rate: 150,
            volume: 0.8,
            pitch: 0.0,
        };
        assert!(!engine.is_available());
        assert!(engine.speak("你好", &VoiceConfig::default()).await.is_err());
        assert!(engine.list_voices().await.unwrap().is_empty());
    }
}
