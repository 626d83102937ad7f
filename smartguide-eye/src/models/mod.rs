//! Detector-facing data model

pub mod detection;

pub use detection::{BoundingBox, Detection, DetectionSource};
