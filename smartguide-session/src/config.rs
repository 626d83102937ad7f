//! Top-level configuration for a guide session

use serde::{Deserialize, Serialize};
use smartguide_core::{load_document, read_document, ConfigError};
use smartguide_eye::VisionConfig;
use smartguide_spk::{EngineKind, SpeechConfig};
use std::path::{Path, PathBuf};
use tracing::warn;
use url::Url;

/// Base of the maps directions link opened when navigation starts.
pub const DEFAULT_MAPS_BASE_URL: &str = "https://www.google.com/maps/dir/?api=1";

/// Complete session configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    pub vision: VisionConfig,
    pub speech: SpeechConfig,
    pub dialogue: DialogueConfig,
    pub navigation: NavigationConfig,
}

/// Voice intake settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Times each question is asked before settling for the fallback reply
    pub max_attempts: u32,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self { max_attempts: 1 }
    }
}

impl DialogueConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }
        if self.max_attempts > 10 {
            return Err("max_attempts too large (max 10)".to_string());
        }
        Ok(())
    }
}

/// Navigation hand-off settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub base_url: String,

    /// Open the directions link in the system browser
    pub open_browser: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MAPS_BASE_URL.to_string(),
            open_browser: true,
        }
    }
}

impl NavigationConfig {
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.base_url).map_err(|e| format!("base_url: {}", e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!("base_url must be http or https, got '{}'", url.scheme()));
        }
        Ok(())
    }
}

impl GuideConfig {
    /// Load configuration from a JSON, TOML or YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_document(path.as_ref())
    }

    /// Parse configuration from a string (JSON, TOML or YAML)
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        load_document(content)
    }

    /// Defaults overlaid with `SMARTGUIDE_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Overlay values found through `lookup`. Unparseable values are logged and ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("SMARTGUIDE_CAMERA_ID") {
            match value.trim().parse() {
                Ok(id) => self.vision.camera_id = id,
                Err(_) => warn!("Ignoring SMARTGUIDE_CAMERA_ID={}", value),
            }
        }

        if let Some(value) = lookup("SMARTGUIDE_MIN_INTERVAL_MS") {
            match value.trim().parse() {
                Ok(ms) => self.vision.min_interval_ms = ms,
                Err(_) => warn!("Ignoring SMARTGUIDE_MIN_INTERVAL_MS={}", value),
            }
        }

        if let Some(value) = lookup("SMARTGUIDE_LANGUAGE") {
            self.speech.voice.language = value.trim().to_string();
        }

        if let Some(value) = lookup("SMARTGUIDE_SPEECH_ENGINE") {
            match value.parse::<EngineKind>() {
                Ok(engine) => self.speech.engine = engine,
                Err(e) => warn!("Ignoring SMARTGUIDE_SPEECH_ENGINE: {}", e),
            }
        }

        if let Some(value) = lookup("SMARTGUIDE_OPEN_BROWSER") {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.navigation.open_browser = true,
                "0" | "false" | "no" | "off" => self.navigation.open_browser = false,
                _ => warn!("Ignoring SMARTGUIDE_OPEN_BROWSER={}", value),
            }
        }
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(&mut self, other: GuideConfig) {
        self.vision = other.vision;
        self.speech = other.speech;
        self.dialogue = other.dialogue;
        self.navigation = other.navigation;
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.vision
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("vision: {}", e)))?;
        self.speech
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("speech: {}", e)))?;
        self.dialogue
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("dialogue: {}", e)))?;
        self.navigation
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("navigation: {}", e)))?;
        Ok(())
    }

    /// `<config dir>/smartguide/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("smartguide").join("config.toml"))
    }
}
