//! Object detection pipeline

use crate::camera::Frame;
use crate::error::VisionError;
use crate::models::{Detection, DetectionSource};
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs the detector and filters what it returns before classification.
pub struct DetectionPipeline {
    source: Arc<dyn DetectionSource>,
    min_confidence: f32,
}

impl DetectionPipeline {
    /// Create a new detection pipeline
    pub fn new(source: Arc<dyn DetectionSource>, min_confidence: f32) -> Self {
        Self {
            source,
            min_confidence,
        }
    }

    /// Detect objects in `frame`, dropping low-confidence and unlabeled results.
    pub async fn detect(&self, frame: &Frame) -> Result<Vec<Detection>, VisionError> {
        debug!("Running {} on frame {}", self.source.name(), frame.sequence());
        let raw = self.source.detect(frame).await?;
        let total = raw.len();

        let detections: Vec<Detection> = raw
            .into_iter()
            .filter(|d| {
                if d.label.trim().is_empty() {
                    warn!("Dropping detection with empty label");
                    return false;
                }
                d.confidence.is_finite() && d.confidence >= self.min_confidence
            })
            .collect();

        debug!(
            "Detected {} objects ({} below threshold)",
            detections.len(),
            total - detections.len()
        );
        Ok(detections)
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }
}
