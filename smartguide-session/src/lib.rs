//! smartguide-session: one guided walk
//!
//! Asks the user where they are going and how ([`IntakeDialogue`]), opens
//! directions for them ([`Navigator`]) and then narrates the camera view
//! ([`DetectionLoop`]) until detection is switched off.

pub mod config;
pub mod detection_loop;
pub mod dialogue;
pub mod error;
pub mod navigation;
pub mod session;

pub use config::{DialogueConfig, GuideConfig, NavigationConfig};
pub use detection_loop::{DetectionLoop, DetectionToggle, LoopReport, StopReason};
pub use dialogue::{DialogueState, DialogueStep, IntakeDialogue};
pub use error::{Result, SessionError};
pub use navigation::{
    build_maps_url, NavigationLauncher, Navigator, NullLauncher, SystemBrowserLauncher,
    TransportMode, TRANSPORT_CHOICES,
};
pub use session::GuideSession;
