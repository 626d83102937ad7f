//! Per-frame grouping of detection labels by region

use crate::models::Detection;
use crate::processing::region::{classify, Region};
use std::collections::BTreeSet;

/// Distinct labels seen in each region during one frame.
///
/// Every detection of the frame lands in exactly one region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameObservation {
    regions: [BTreeSet<String>; 3],
}

impl FrameObservation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition `detections` across the three regions of a frame
    /// `frame_width` pixels wide.
    pub fn from_detections(detections: &[Detection], frame_width: u32) -> Self {
        let mut observation = Self::new();
        for detection in detections {
            let region = classify(&detection.bbox, frame_width);
            observation.insert(region, detection.label.clone());
        }
        observation
    }

    pub fn insert(&mut self, region: Region, label: impl Into<String>) {
        self.regions[region.index()].insert(label.into());
    }

    pub fn labels(&self, region: Region) -> &BTreeSet<String> {
        &self.regions[region.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.regions.iter().all(|labels| labels.is_empty())
    }

    /// Number of distinct (region, label) pairs.
    pub fn len(&self) -> usize {
        self.regions.iter().map(|labels| labels.len()).sum()
    }
}
