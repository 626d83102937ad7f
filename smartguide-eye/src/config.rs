//! Configuration for smartguide-eye

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Vision and narration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Camera device index (0, 1, 2, etc.)
    pub camera_id: u32,
    /// Target frame rate (frames per second)
    pub frame_rate: u32,
    /// Camera resolution (width, height)
    pub resolution: (u32, u32),
    /// Detections scoring below this are dropped before classification
    pub min_confidence: f32,
    /// Minimum spacing between two spoken narrations, in milliseconds
    pub min_interval_ms: u64,
    /// Draw boxes and labels on displayed frames
    pub annotate_frames: bool,
    /// Font for box labels; a system font is used when unset or unloadable
    pub label_font: Option<PathBuf>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            camera_id: 0,
            frame_rate: 30,
            resolution: (640, 480),
            min_confidence: 0.25,
            min_interval_ms: 3000,
            annotate_frames: true,
            label_font: None,
        }
    }
}

impl VisionConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.frame_rate == 0 || self.frame_rate > 120 {
            return Err("Frame rate must be between 1 and 120".to_string());
        }

        if self.resolution.0 == 0 || self.resolution.1 == 0 {
            return Err("Resolution must be non-zero".to_string());
        }

        if self.resolution.0 > 7680 || self.resolution.1 > 4320 {
            return Err("Resolution too large (max 8K)".to_string());
        }

        if self.camera_id > 100 {
            return Err("Camera ID too large (max 100)".to_string());
        }

        if !self.min_confidence.is_finite() || !(0.0..=1.0).contains(&self.min_confidence) {
            return Err("Minimum confidence must be between 0.0 and 1.0".to_string());
        }

        if self.min_interval_ms > 600_000 {
            return Err("Narration interval too large (max 600000 ms)".to_string());
        }

        Ok(())
    }
}
