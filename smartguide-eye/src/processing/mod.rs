//! Vision processing pipelines

pub mod detection;
pub mod observation;
pub mod region;

pub use detection::DetectionPipeline;
pub use observation::FrameObservation;
pub use region::{classify, Region};
