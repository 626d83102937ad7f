//! Speech recognition results

use serde::{Deserialize, Serialize};

/// Reply used whenever the listener's input could not be understood.
pub const NOT_UNDERSTOOD_REPLY: &str = "我沒有聽清楚，請再說一次。";

/// Outcome of one listening attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recognition {
    Heard(String),
    NotUnderstood,
}

impl Recognition {
    /// Raw recognizer output; `None`, blank and whitespace-only input are not understood.
    pub fn from_input(input: Option<String>) -> Self {
        match input {
            Some(text) if !text.trim().is_empty() => Recognition::Heard(text.trim().to_string()),
            _ => Recognition::NotUnderstood,
        }
    }

    pub fn is_understood(&self) -> bool {
        matches!(self, Recognition::Heard(text) if !text.trim().is_empty())
    }

    /// Recognized text, or [`NOT_UNDERSTOOD_REPLY`].
    pub fn into_text(self) -> String {
        match self {
            Recognition::Heard(text) if !text.trim().is_empty() => text,
            _ => NOT_UNDERSTOOD_REPLY.to_string(),
        }
    }
}
