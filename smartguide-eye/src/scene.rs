//! Scripted scenes: recorded detections replayed as a camera and detector
//!
//! A scene file is JSON Lines, one frame per line:
//!
//! ```text
//! {"width":900,"height":600,"detections":[{"label":"人","box":[400,10,500,200],"confidence":0.9}]}
//! ```
//!
//! An optional `"repeat": n` makes one line stand for `n` identical frames.
//! Blank lines and lines starting with `#` are ignored. The camera yields a
//! blank frame of the recorded size per line and the detector answers with
//! the detections recorded for that frame's sequence number.

use crate::camera::{Frame, FrameSource};
use crate::error::VisionError;
use crate::models::{Detection, DetectionSource};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const MAX_DIMENSION: u32 = 7680;
const MAX_REPEAT: u32 = 100_000;

/// One recorded frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFrame {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub detections: Vec<Detection>,
    /// When set, the detector fails on this frame with this message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detector_error: Option<String>,
    /// Number of consecutive frames this line stands for.
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_repeat() -> u32 {
    1
}

impl SceneFrame {
    pub fn new(width: u32, height: u32, detections: Vec<Detection>) -> Self {
        Self {
            width,
            height,
            detections,
            detector_error: None,
            repeat: 1,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("frame dimensions must be non-zero".to_string());
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(format!("frame dimensions exceed {}", MAX_DIMENSION));
        }
        if self.repeat == 0 || self.repeat > MAX_REPEAT {
            return Err(format!("repeat must be between 1 and {}", MAX_REPEAT));
        }
        Ok(())
    }
}

fn push_repeated(frames: &mut Vec<SceneFrame>, frame: SceneFrame) {
    let count = frame.repeat as usize;
    frames.extend(std::iter::repeat(SceneFrame { repeat: 1, ..frame }).take(count));
}

/// Replayable recording shared by its camera and detector.
#[derive(Debug, Clone)]
pub struct ScriptedScene {
    frames: Arc<Vec<SceneFrame>>,
    pace: Option<Duration>,
}

impl ScriptedScene {
    pub fn new(frames: Vec<SceneFrame>) -> Result<Self, VisionError> {
        let mut expanded = Vec::with_capacity(frames.len());
        for (index, frame) in frames.into_iter().enumerate() {
            frame
                .validate()
                .map_err(|e| VisionError::Scene(format!("frame {}: {}", index, e)))?;
            push_repeated(&mut expanded, frame);
        }
        Ok(Self {
            frames: Arc::new(expanded),
            pace: None,
        })
    }

    /// Parse a JSON Lines recording.
    pub fn parse(text: &str) -> Result<Self, VisionError> {
        let mut frames = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let frame: SceneFrame = serde_json::from_str(line)
                .map_err(|e| VisionError::Scene(format!("line {}: {}", number + 1, e)))?;
            frame
                .validate()
                .map_err(|e| VisionError::Scene(format!("line {}: {}", number + 1, e)))?;
            push_repeated(&mut frames, frame);
        }
        Ok(Self {
            frames: Arc::new(frames),
            pace: None,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VisionError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let scene = Self::parse(&text)?;
        info!("Loaded scene {} ({} frames)", path.display(), scene.len());
        Ok(scene)
    }

    /// Delay between frames when replayed through [`ScriptedScene::camera`].
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = Some(pace);
        self
    }

    /// Pace matching a capture rate in frames per second.
    pub fn with_frame_rate(self, frame_rate: u32) -> Self {
        if frame_rate == 0 {
            return self;
        }
        self.with_pace(Duration::from_secs_f64(1.0 / f64::from(frame_rate)))
    }

    pub fn frames(&self) -> &[SceneFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn camera(&self) -> ScriptedCamera {
        ScriptedCamera {
            frames: Arc::clone(&self.frames),
            pace: self.pace,
            cursor: 0,
            opened: false,
        }
    }

    pub fn detector(&self) -> ScriptedDetector {
        ScriptedDetector {
            frames: Arc::clone(&self.frames),
        }
    }
}

/// Camera replaying a [`ScriptedScene`] as blank frames.
#[derive(Debug)]
pub struct ScriptedCamera {
    frames: Arc<Vec<SceneFrame>>,
    pace: Option<Duration>,
    cursor: usize,
    opened: bool,
}

impl ScriptedCamera {
    pub fn is_open(&self) -> bool {
        self.opened
    }
}

#[async_trait]
impl FrameSource for ScriptedCamera {
    async fn open(&mut self) -> Result<(), VisionError> {
        self.opened = true;
        self.cursor = 0;
        debug!("Scripted camera opened ({} frames)", self.frames.len());
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<Frame>, VisionError> {
        if !self.opened {
            return Err(VisionError::Camera("camera is not open".to_string()));
        }
        let Some(recorded) = self.frames.get(self.cursor) else {
            return Ok(None);
        };
        if let Some(pace) = self.pace {
            tokio::time::sleep(pace).await;
        }
        let frame = Frame::blank(self.cursor as u64, recorded.width, recorded.height);
        self.cursor += 1;
        Ok(Some(frame))
    }

    async fn release(&mut self) {
        if self.opened {
            debug!("Scripted camera released after {} frames", self.cursor);
        }
        self.opened = false;
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Detector answering with the detections recorded for each frame.
#[derive(Debug, Clone)]
pub struct ScriptedDetector {
    frames: Arc<Vec<SceneFrame>>,
}

#[async_trait]
impl DetectionSource for ScriptedDetector {
    async fn detect(&self, frame: &Frame) -> Result<Vec<Detection>, VisionError> {
        let recorded = usize::try_from(frame.sequence())
            .ok()
            .and_then(|index| self.frames.get(index))
            .ok_or_else(|| {
                VisionError::Detection(format!("no recorded frame {}", frame.sequence()))
            })?;
        if let Some(message) = &recorded.detector_error {
            return Err(VisionError::Detection(message.clone()));
        }
        Ok(recorded.detections.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
