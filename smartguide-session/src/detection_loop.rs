//! The driving loop: frame, detect, observe, narrate, display

use crate::error::Result;
use serde::Serialize;
use smartguide_core::Clock;
use smartguide_eye::{
    Annotator, DetectionPipeline, DetectionSource, FrameDisplay, FrameObservation, FrameSource,
    NarrationScheduler, NarrationState, TickOutcome, VisionConfig,
};
use smartguide_spk::SpeechSink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Shared on/off switch polled once per loop iteration.
#[derive(Debug, Clone, Default)]
pub struct DetectionToggle(Arc<AtomicBool>);

impl DetectionToggle {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn enable(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn disable(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// Detection was switched off.
    Toggled,
    /// The camera ran out of frames.
    CaptureEnded,
    /// The camera failed to deliver a frame.
    CaptureFailed(String),
}

/// Summary of one detection session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoopReport {
    pub frames: u64,
    pub utterances: u64,
    pub failed_dispatches: u64,
    pub skipped_frames: u64,
    pub stop_reason: StopReason,
}

/// Runs narration over a camera until toggled off or capture ends.
pub struct DetectionLoop {
    scheduler: NarrationScheduler,
    speech: Arc<dyn SpeechSink>,
    clock: Arc<dyn Clock>,
    toggle: DetectionToggle,
    min_interval: Duration,
    min_confidence: f32,
    annotator: Option<Annotator>,
    display: Option<Arc<dyn FrameDisplay>>,
}

impl DetectionLoop {
    pub fn new(
        config: &VisionConfig,
        speech: Arc<dyn SpeechSink>,
        clock: Arc<dyn Clock>,
        toggle: DetectionToggle,
    ) -> Self {
        Self {
            scheduler: NarrationScheduler::default(),
            speech,
            clock,
            toggle,
            min_interval: config.min_interval(),
            min_confidence: config.min_confidence,
            annotator: config.annotate_frames.then(|| Annotator::from_config(config)),
            display: None,
        }
    }

    pub fn with_scheduler(mut self, scheduler: NarrationScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_display(mut self, display: Arc<dyn FrameDisplay>) -> Self {
        self.display = Some(display);
        self
    }

    /// Replaces the annotator; `None` shows frames unannotated.
    pub fn with_annotator(mut self, annotator: Option<Annotator>) -> Self {
        self.annotator = annotator;
        self
    }

    pub fn toggle(&self) -> &DetectionToggle {
        &self.toggle
    }

    /// Open `camera`, narrate until stopped, and release the camera on
    /// every exit path.
    pub async fn run(
        &self,
        camera: &mut dyn FrameSource,
        detector: Arc<dyn DetectionSource>,
    ) -> Result<LoopReport> {
        if let Err(e) = camera.open().await {
            camera.release().await;
            return Err(e.into());
        }
        info!("Detection started (camera: {}, detector: {})", camera.name(), detector.name());

        let pipeline = DetectionPipeline::new(detector, self.min_confidence);
        let report = self.drive(camera, &pipeline).await;
        camera.release().await;

        info!(
            "Detection stopped ({:?}): {} frames, {} utterances, {} failed, {} skipped",
            report.stop_reason,
            report.frames,
            report.utterances,
            report.failed_dispatches,
            report.skipped_frames
        );
        Ok(report)
    }

    async fn drive(&self, camera: &mut dyn FrameSource, pipeline: &DetectionPipeline) -> LoopReport {
        let mut state = NarrationState::new(self.clock.now(), self.min_interval);
        let mut report = LoopReport {
            frames: 0,
            utterances: 0,
            failed_dispatches: 0,
            skipped_frames: 0,
            stop_reason: StopReason::Toggled,
        };

        loop {
            if !self.toggle.is_enabled() {
                report.stop_reason = StopReason::Toggled;
                break;
            }

            let frame = match camera.next_frame().await {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    report.stop_reason = StopReason::CaptureEnded;
                    break;
                }
                Err(e) => {
                    warn!("Capture failed: {}", e);
                    report.stop_reason = StopReason::CaptureFailed(e.to_string());
                    break;
                }
            };
            report.frames += 1;

            let detections = match pipeline.detect(&frame).await {
                Ok(detections) => detections,
                Err(e) => {
                    warn!("Detection failed on frame {}: {}", frame.sequence(), e);
                    report.skipped_frames += 1;
                    tokio::task::yield_now().await;
                    continue;
                }
            };

            let observation = FrameObservation::from_detections(&detections, frame.width());
            let (next, outcome) = self.scheduler.tick(state, &observation, self.clock.now());
            state = next;

            if let TickOutcome::Announce(utterance) = outcome {
                match self.speech.say(&utterance).await {
                    Ok(()) => report.utterances += 1,
                    Err(e) => {
                        warn!("Failed to speak narration: {}", e);
                        report.failed_dispatches += 1;
                    }
                }
                // Interval counts from the end of speech
                state = state.reset_at(self.clock.now());
            }

            if let Some(display) = &self.display {
                match &self.annotator {
                    Some(annotator) => display.show(&annotator.annotate(&frame, &detections)),
                    None => display.show(&frame),
                }
            }

            debug!("Frame {} done ({} detections)", frame.sequence(), detections.len());
            tokio::task::yield_now().await;
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartguide_core::ManualClock;
    use smartguide_eye::ScriptedScene;
    use smartguide_spk::{Recognition, SpeechError};

    struct Mute;

    #[async_trait::async_trait]
    impl SpeechSink for Mute {
        async fn say(&self, _text: &str) -> std::result::Result<(), SpeechError> {
            Ok(())
        }

        async fn listen(&self, _prompt: &str) -> Recognition {
            Recognition::NotUnderstood
        }
    }

    #[test]
    fn test_toggle_clones_share_state() {
        let toggle = DetectionToggle::default();
        let other = toggle.clone();
        assert!(!toggle.is_enabled());
        other.enable();
        assert!(toggle.is_enabled());
        toggle.disable();
        assert!(!other.is_enabled());
    }

    #[test]
    fn test_replays_whole_scene() {
        let scene = ScriptedScene::parse("{\"width\":30,\"height\":30,\"repeat\":6}").unwrap();
        let detection = DetectionLoop::new(
            &VisionConfig::default(),
            Arc::new(Mute),
            Arc::new(ManualClock::new()),
            DetectionToggle::new(true),
        );

        let mut camera = scene.camera();
        let report = tokio_test::block_on(detection.run(&mut camera, Arc::new(scene.detector()))).unwrap();

        assert_eq!(report.frames, 6);
        assert_eq!(report.utterances, 0);
        assert_eq!(report.stop_reason, StopReason::CaptureEnded);
        assert!(!camera.is_open());
    }
}
