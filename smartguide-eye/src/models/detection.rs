//! Detector output types and the detector capability

use crate::camera::Frame;
use crate::error::VisionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in integer pixel coordinates, `x1 < x2` and `y1 < y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i32; 4]", into = "[i32; 4]")]
pub struct BoundingBox {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self, VisionError> {
        if x1 >= x2 || y1 >= y2 {
            return Err(VisionError::InvalidBox(format!(
                "({}, {}, {}, {}) is empty or inverted",
                x1, y1, x2, y2
            )));
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// Box of the given width centred horizontally on `center_x`.
    pub fn centered_at(center_x: i32, y1: i32, half_width: i32, height: i32) -> Result<Self, VisionError> {
        Self::new(center_x - half_width, y1, center_x + half_width, y1 + height)
    }

    pub fn x1(&self) -> i32 {
        self.x1
    }

    pub fn y1(&self) -> i32 {
        self.y1
    }

    pub fn x2(&self) -> i32 {
        self.x2
    }

    pub fn y2(&self) -> i32 {
        self.y2
    }

    pub fn width(&self) -> u32 {
        (self.x2 as i64 - self.x1 as i64) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y2 as i64 - self.y1 as i64) as u32
    }

    /// Horizontal centre, rounded toward negative infinity.
    pub fn center_x(&self) -> i64 {
        (self.x1 as i64 + self.x2 as i64).div_euclid(2)
    }
}

impl TryFrom<[i32; 4]> for BoundingBox {
    type Error = VisionError;

    fn try_from(coords: [i32; 4]) -> Result<Self, Self::Error> {
        Self::new(coords[0], coords[1], coords[2], coords[3])
    }
}

impl From<BoundingBox> for [i32; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.x1, bbox.y1, bbox.x2, bbox.y2]
    }
}

/// One labeled box produced by the detector for a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    1.0
}

impl Detection {
    pub fn new(label: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            bbox,
            confidence: 1.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }
}

/// Object detector treated as a black box.
///
/// Implementations must report what is in the frame as captured; drawing
/// on the frame for display happens afterwards on a copy.
#[async_trait]
pub trait DetectionSource: Send + Sync {
    async fn detect(&self, frame: &Frame) -> Result<Vec<Detection>, VisionError>;

    /// Get detector name
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_rejects_inverted() {
        assert!(BoundingBox::new(10, 0, 10, 5).is_err());
        assert!(BoundingBox::new(10, 0, 5, 5).is_err());
        assert!(BoundingBox::new(0, 5, 10, 5).is_err());
        assert!(BoundingBox::new(0, 0, 1, 1).is_ok());
    }

    #[test]
    fn test_box_center_floors() {
        let bbox = BoundingBox::new(0, 0, 5, 5).unwrap();
        assert_eq!(bbox.center_x(), 2);

        let bbox = BoundingBox::new(-5, 0, 0, 5).unwrap();
        assert_eq!(bbox.center_x(), -3);
    }

    #[test]
    fn test_box_centered_at() {
        let bbox = BoundingBox::centered_at(100, 0, 20, 40).unwrap();
        assert_eq!(bbox.center_x(), 100);
        assert_eq!(bbox.width(), 40);
        assert_eq!(bbox.height(), 40);
    }

    #[test]
    fn test_detection_json_shape() {
        let json = r#"{"label":"人","box":[10,20,30,40],"confidence":0.9}"#;
        let detection: Detection = serde_json::from_str(json).unwrap();
        assert_eq!(detection.label, "人");
        assert_eq!(detection.bbox, BoundingBox::new(10, 20, 30, 40).unwrap());
        assert!((detection.confidence - 0.9).abs() < f32::EPSILON);

        let back = serde_json::to_value(&detection).unwrap();
        assert_eq!(back["box"], serde_json::json!([10, 20, 30, 40]));
    }

    #[test]
    fn test_detection_json_rejects_bad_box() {
        let json = r#"{"label":"car","box":[30,20,10,40]}"#;
        assert!(serde_json::from_str::<Detection>(json).is_err());
    }

    #[test]
    fn test_detection_confidence_defaults_to_one() {
        let detection: Detection = serde_json::from_str(r#"{"label":"dog","box":[0,0,2,2]}"#).unwrap();
        assert_eq!(detection.confidence, 1.0);
    }
}
