//! smartguide-eye: spatial scene narration
//!
//! Turns per-frame object detections into short spoken phrases describing
//! where things are (left, centre, right), prioritising hazards such as
//! crosswalks, traffic lights and vehicles, and rate-limits them so the
//! listener is not flooded.
//!
//! Capture and detection are capabilities ([`FrameSource`],
//! [`DetectionSource`]); [`ScriptedScene`] replays recorded detections
//! through both.

pub mod annotate;
pub mod camera;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod narration;
pub mod processing;
pub mod scene;

pub use annotate::Annotator;
pub use camera::{Frame, FrameDisplay, FrameSource};
pub use config::VisionConfig;
pub use display::PngSequenceDisplay;
pub use error::VisionError;
pub use models::{BoundingBox, Detection, DetectionSource};
pub use narration::{NarrationScheduler, NarrationState, PhraseResolver, PriorityRule, TickOutcome};
pub use processing::{classify, DetectionPipeline, FrameObservation, Region};
pub use scene::{SceneFrame, ScriptedCamera, ScriptedDetector, ScriptedScene};
