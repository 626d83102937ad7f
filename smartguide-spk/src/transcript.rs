//! Bounded record of what was said and heard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// Spoken by the assistant
    Guide,
    /// Heard from the listener
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Ring of the most recent entries; the oldest is evicted when full.
#[derive(Debug, Clone)]
pub struct Transcript {
    capacity: usize,
    entries: VecDeque<TranscriptEntry>,
}

impl Transcript {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    pub fn record(&mut self, speaker: Speaker, text: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(TranscriptEntry {
            speaker,
            text: text.into(),
            at: Utc::now(),
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter()
    }

    /// Texts from one speaker, oldest first.
    pub fn lines(&self, speaker: Speaker) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.speaker == speaker)
            .map(|e| e.text.clone())
            .collect()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let mut transcript = Transcript::new(2);
        transcript.record(Speaker::Guide, "一");
        transcript.record(Speaker::User, "二");
        transcript.record(Speaker::Guide, "三");

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.lines(Speaker::Guide), vec!["三".to_string()]);
        assert_eq!(transcript.lines(Speaker::User), vec!["二".to_string()]);
        assert_eq!(transcript.last().map(|e| e.text.as_str()), Some("三"));
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut transcript = Transcript::new(0);
        transcript.record(Speaker::Guide, "a");
        transcript.record(Speaker::Guide, "b");
        assert_eq!(transcript.capacity(), 1);
        assert_eq!(transcript.lines(Speaker::Guide), vec!["b".to_string()]);
    }
}
