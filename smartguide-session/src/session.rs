//! A guide session: intake, navigation hand-off and detection control

use crate::config::GuideConfig;
use crate::detection_loop::{DetectionLoop, DetectionToggle, LoopReport};
use crate::dialogue::{DialogueState, IntakeDialogue};
use crate::error::{Result, SessionError};
use crate::navigation::{NavigationLauncher, Navigator};
use parking_lot::RwLock;
use smartguide_core::Clock;
use smartguide_eye::{DetectionSource, FrameDisplay, FrameSource};
use smartguide_spk::SpeechSink;
use std::sync::Arc;
use tracing::info;

/// Owns the dialogue state and the detection switch for one user.
pub struct GuideSession {
    config: GuideConfig,
    speech: Arc<dyn SpeechSink>,
    dialogue: IntakeDialogue,
    state: RwLock<DialogueState>,
    toggle: DetectionToggle,
    clock: Arc<dyn Clock>,
    display: Option<Arc<dyn FrameDisplay>>,
}

impl GuideSession {
    pub fn new(
        config: GuideConfig,
        speech: Arc<dyn SpeechSink>,
        launcher: Arc<dyn NavigationLauncher>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let navigator = Navigator::new(&config.navigation, launcher)?;
        let dialogue = IntakeDialogue::new(speech.clone(), navigator, &config.dialogue);

        Ok(Self {
            config,
            speech,
            dialogue,
            state: RwLock::new(DialogueState::default()),
            toggle: DetectionToggle::default(),
            clock,
            display: None,
        })
    }

    pub fn with_display(mut self, display: Arc<dyn FrameDisplay>) -> Self {
        self.display = Some(display);
        self
    }

    pub fn config(&self) -> &GuideConfig {
        &self.config
    }

    pub fn state(&self) -> DialogueState {
        self.state.read().clone()
    }

    /// Handle for stopping detection from another task.
    pub fn toggle(&self) -> DetectionToggle {
        self.toggle.clone()
    }

    pub fn is_detecting(&self) -> bool {
        self.toggle.is_enabled()
    }

    /// Voice intake; a no-op once the intake has completed.
    pub async fn start_voice_intake(&self) -> Result<DialogueState> {
        let current = self.state();
        let next = self.dialogue.run(current).await?;
        self.commit(next.clone());
        Ok(next)
    }

    /// Manual intake from a chosen destination and transport.
    pub async fn start_manual(&self, destination: &str, transport: &str) -> Result<DialogueState> {
        let current = self.state();
        let next = self.dialogue.manual(current, destination, transport).await?;
        self.commit(next.clone());
        Ok(next)
    }

    /// Switch detection off; a running loop stops at its next iteration.
    pub fn stop_detection(&self) {
        self.toggle.disable();
        self.state.write().detecting = false;
        info!("Detection stop requested");
    }

    /// Narrate `camera` until detection is stopped or capture ends.
    pub async fn run_detection(
        &self,
        camera: &mut dyn FrameSource,
        detector: Arc<dyn DetectionSource>,
    ) -> Result<LoopReport> {
        if !self.is_detecting() {
            return Err(SessionError::Dialogue(
                "detection is not enabled; complete the intake first".to_string(),
            ));
        }

        let mut detection = DetectionLoop::new(
            &self.config.vision,
            self.speech.clone(),
            self.clock.clone(),
            self.toggle.clone(),
        );
        if let Some(display) = &self.display {
            detection = detection.with_display(display.clone());
        }
        detection.run(camera, detector).await
    }

    fn commit(&self, next: DialogueState) {
        if next.detecting {
            self.toggle.enable();
        }
        *self.state.write() = next;
    }
}
