//! Voice intake: ask where to go and how, then start navigation

use crate::config::DialogueConfig;
use crate::error::Result;
use crate::navigation::Navigator;
use serde::{Deserialize, Serialize};
use smartguide_spk::voice::DEFAULT_LISTEN_PROMPT;
use smartguide_spk::{Recognition, SpeechSink, NOT_UNDERSTOOD_REPLY};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const GREETING_PROMPT: &str = "您好，我是您的智慧導盲助手。請問今天想要去哪裡？";
pub const TRANSPORT_PROMPT: &str = "請問您想用什麼交通工具？例如走路、公車或捷運。";
pub const NAVIGATION_STARTED: &str = "已為您開啟 Google Maps 導航，並啟用智慧鏡頭偵測。";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DialogueStep {
    #[default]
    AwaitDestination = 0,
    Detecting = 1,
}

impl DialogueStep {
    pub fn index(&self) -> u8 {
        *self as u8
    }
}

/// Where the session is in the intake, and what it has collected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DialogueState {
    pub step: DialogueStep,
    pub destination: String,
    pub transport: String,
    pub detecting: bool,
}

/// The intake conversation. Every path finishes in a bounded number of
/// questions and ends with detection enabled.
#[derive(Clone)]
pub struct IntakeDialogue {
    speech: Arc<dyn SpeechSink>,
    navigator: Navigator,
    max_attempts: u32,
}

impl IntakeDialogue {
    pub fn new(speech: Arc<dyn SpeechSink>, navigator: Navigator, config: &DialogueConfig) -> Self {
        Self {
            speech,
            navigator,
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Run the voice intake from `state`.
    ///
    /// A state already at [`DialogueStep::Detecting`] is returned unchanged.
    /// Unintelligible answers become [`NOT_UNDERSTOOD_REPLY`] and are used as
    /// the answer once attempts run out.
    pub async fn run(&self, state: DialogueState) -> Result<DialogueState> {
        if state.step == DialogueStep::Detecting {
            debug!("Intake already complete");
            return Ok(state);
        }

        self.say(GREETING_PROMPT).await;
        let destination = self.ask().await;
        info!("Destination (voice): {}", destination);

        self.say(TRANSPORT_PROMPT).await;
        let transport = self.ask().await;
        info!("Transport (voice): {}", transport);

        self.start_navigation(state, destination, transport).await
    }

    /// Form path: destination and transport chosen without speaking.
    pub async fn manual(
        &self,
        state: DialogueState,
        destination: &str,
        transport: &str,
    ) -> Result<DialogueState> {
        let destination = destination.trim();
        if destination.is_empty() {
            warn!("Starting navigation without a destination");
        }
        self.start_navigation(state, destination.to_string(), transport.trim().to_string())
            .await
    }

    async fn ask(&self) -> String {
        let mut recognition = Recognition::NotUnderstood;
        for attempt in 1..=self.max_attempts {
            recognition = self.speech.listen(DEFAULT_LISTEN_PROMPT).await;
            if recognition.is_understood() {
                break;
            }
            if attempt < self.max_attempts {
                debug!("Not understood, asking again ({}/{})", attempt, self.max_attempts);
                self.say(NOT_UNDERSTOOD_REPLY).await;
            }
        }
        recognition.into_text()
    }

    async fn start_navigation(
        &self,
        state: DialogueState,
        destination: String,
        transport: String,
    ) -> Result<DialogueState> {
        self.navigator.open(&destination, &transport)?;
        self.say(NAVIGATION_STARTED).await;

        let mut next = state;
        next.step = DialogueStep::Detecting;
        next.destination = destination;
        next.transport = transport;
        next.detecting = true;
        Ok(next)
    }

    async fn say(&self, text: &str) {
        if let Err(e) = self.speech.say(text).await {
            warn!("Failed to speak '{}': {}", text, e);
        }
    }
}
