//! Spoken narration of what the camera sees

pub mod phrase;
pub mod scheduler;

pub use phrase::{default_rules, PhraseResolver, PriorityRule};
pub use scheduler::{NarrationScheduler, NarrationState, TickOutcome, UTTERANCE_SEPARATOR};
