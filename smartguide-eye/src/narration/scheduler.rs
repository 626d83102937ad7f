//! Rate-limited assembly of per-region phrases into one utterance

use crate::narration::phrase::PhraseResolver;
use crate::processing::{FrameObservation, Region};
use std::time::{Duration, Instant};
use tracing::debug;

/// Separator between region phrases in an utterance.
pub const UTTERANCE_SEPARATOR: &str = "，";

/// Debounce timer threaded through the narration loop by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrationState {
    last_spoken_at: Instant,
    min_interval: Duration,
}

impl NarrationState {
    /// Timer that treats `started_at` as the last announcement, so the first
    /// narration waits one full interval.
    pub fn new(started_at: Instant, min_interval: Duration) -> Self {
        Self {
            last_spoken_at: started_at,
            min_interval,
        }
    }

    pub fn last_spoken_at(&self) -> Instant {
        self.last_spoken_at
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Strictly more than `min_interval` has passed since the last reset.
    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_spoken_at) > self.min_interval
    }

    pub fn reset_at(self, at: Instant) -> Self {
        Self {
            last_spoken_at: at,
            ..self
        }
    }
}

/// What one tick decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Interval not elapsed; state untouched.
    Suppressed,
    /// Interval elapsed but nothing to say; timer reset anyway.
    Silent,
    /// Interval elapsed; this utterance should be spoken.
    Announce(String),
}

impl TickOutcome {
    pub fn utterance(&self) -> Option<&str> {
        match self {
            TickOutcome::Announce(text) => Some(text),
            _ => None,
        }
    }
}

/// Turns frame observations into at most one utterance per interval.
#[derive(Debug, Clone, Default)]
pub struct NarrationScheduler {
    resolver: PhraseResolver,
}

impl NarrationScheduler {
    pub fn new(resolver: PhraseResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &PhraseResolver {
        &self.resolver
    }

    /// Non-empty region phrases in LEFT, CENTER, RIGHT order.
    pub fn phrases(&self, observation: &FrameObservation) -> Vec<String> {
        Region::ALL
            .iter()
            .filter_map(|&region| self.resolver.resolve(region, observation.labels(region)))
            .collect()
    }

    /// Advance the narration timer for one frame.
    ///
    /// Returns the state to carry into the next frame together with the
    /// decision. Whenever the interval has elapsed the returned state is
    /// reset to `now`, whether or not anything is announced.
    pub fn tick(
        &self,
        state: NarrationState,
        observation: &FrameObservation,
        now: Instant,
    ) -> (NarrationState, TickOutcome) {
        let phrases = self.phrases(observation);

        if !state.is_due(now) {
            return (state, TickOutcome::Suppressed);
        }

        let next = state.reset_at(now);
        if phrases.is_empty() {
            debug!("Narration due but frame is empty");
            return (next, TickOutcome::Silent);
        }

        let utterance = phrases.join(UTTERANCE_SEPARATOR);
        debug!("Narration due: {}", utterance);
        (next, TickOutcome::Announce(utterance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(entries: &[(Region, &str)]) -> FrameObservation {
        let mut observation = FrameObservation::new();
        for (region, label) in entries {
            observation.insert(*region, *label);
        }
        observation
    }

    #[test]
    fn test_suppressed_inside_interval() {
        let scheduler = NarrationScheduler::default();
        let start = Instant::now();
        let state = NarrationState::new(start, Duration::from_secs(3));
        let obs = observation(&[(Region::Left, "人")]);

        let (next, outcome) = scheduler.tick(state, &obs, start + Duration::from_secs(2));
        assert_eq!(outcome, TickOutcome::Suppressed);
        assert_eq!(next, state);
    }

    #[test]
    fn test_exact_interval_is_still_suppressed() {
        let scheduler = NarrationScheduler::default();
        let start = Instant::now();
        let state = NarrationState::new(start, Duration::from_secs(3));
        let obs = observation(&[(Region::Left, "人")]);

        let (next, outcome) = scheduler.tick(state, &obs, start + Duration::from_secs(3));
        assert_eq!(outcome, TickOutcome::Suppressed);
        assert_eq!(next.last_spoken_at(), start);
    }

    #[test]
    fn test_announce_resets_timer() {
        let scheduler = NarrationScheduler::default();
        let start = Instant::now();
        let state = NarrationState::new(start, Duration::from_secs(3));
        let obs = observation(&[(Region::Center, "人")]);
        let now = start + Duration::from_secs(5);

        let (next, outcome) = scheduler.tick(state, &obs, now);
        assert_eq!(outcome.utterance(), Some("中間有人"));
        assert_eq!(next.last_spoken_at(), now);
        assert_eq!(next.min_interval(), Duration::from_secs(3));
    }

    #[test]
    fn test_silent_frame_resets_timer() {
        let scheduler = NarrationScheduler::default();
        let start = Instant::now();
        let state = NarrationState::new(start, Duration::from_secs(3));
        let now = start + Duration::from_secs(4);

        let (next, outcome) = scheduler.tick(state, &FrameObservation::new(), now);
        assert_eq!(outcome, TickOutcome::Silent);
        assert_eq!(outcome.utterance(), None);
        assert_eq!(next.last_spoken_at(), now);
    }

    #[test]
    fn test_back_to_back_ticks() {
        let scheduler = NarrationScheduler::default();
        let start = Instant::now();
        let state = NarrationState::new(start, Duration::from_secs(3));
        let obs = observation(&[(Region::Right, "dog")]);

        let first = start + Duration::from_secs(4);
        let (state, outcome) = scheduler.tick(state, &obs, first);
        assert!(matches!(outcome, TickOutcome::Announce(_)));

        let (state, outcome) = scheduler.tick(state, &obs, first + Duration::from_millis(500));
        assert_eq!(outcome, TickOutcome::Suppressed);
        assert_eq!(state.last_spoken_at(), first);
    }

    #[test]
    fn test_region_order_in_utterance() {
        let scheduler = NarrationScheduler::default();
        let obs = observation(&[(Region::Right, "dog"), (Region::Left, "chair"), (Region::Center, "人")]);

        assert_eq!(
            scheduler.phrases(&obs),
            vec!["左邊有椅子".to_string(), "中間有人".to_string(), "右邊有狗".to_string()]
        );
    }

    #[test]
    fn test_clock_going_backwards_is_not_due() {
        let start = Instant::now() + Duration::from_secs(10);
        let state = NarrationState::new(start, Duration::from_secs(3));
        assert!(!state.is_due(start - Duration::from_secs(5)));
    }
}
