//! Press-duration bookkeeping for long-press controls.

use std::time::Duration;
use std::time::Instant;

/// Tracks how long a momentary control has been held.
///
/// Callers must evaluate [`Self::is_long_press`] before calling
/// [`Self::reset`]; resetting forgets the press entirely.
#[derive(Debug)]
pub struct HoldTracker {
    threshold: Duration,
    since: Option<Instant>,
}

impl HoldTracker {
    #[must_use]
    pub fn new(threshold: Duration) -> Self {
        Self { threshold, since: None }
    }

    /// Records a press edge. A repeated set refreshes the timestamp.
    pub fn set(&mut self, now: Instant) {
        self.since = Some(now);
    }

    /// Forgets the press.
    pub fn reset(&mut self) {
        self.since = None;
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.since.is_some()
    }

    /// Whether the control has been held longer than the threshold.
    #[must_use]
    pub fn is_long_press(&self, now: Instant) -> bool {
        match self.since {
            Some(since) => now.duration_since(since) > self.threshold,
            None => false,
        }
    }
}

/// One-shot flag consumed by the next release edge.
///
/// Used to swallow a release that would otherwise trigger an action,
/// e.g. the recall after a long press already saved a preset.
#[derive(Debug, Default)]
pub struct ReleaseLatch {
    armed: bool,
}

impl ReleaseLatch {
    pub fn arm(&mut self) {
        self.armed = true;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Clears the latch, reporting whether it was armed.
    pub fn consume(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: Duration = Duration::from_secs(2);

    #[test]
    fn short_hold_is_not_long_press() {
        let mut tracker = HoldTracker::new(THRESHOLD);
        let start = Instant::now();
        tracker.set(start);
        assert!(tracker.is_set());
        assert!(!tracker.is_long_press(start + Duration::from_millis(300)));
    }

    #[test]
    fn crossing_threshold_becomes_long_press() {
        let mut tracker = HoldTracker::new(THRESHOLD);
        let start = Instant::now();
        tracker.set(start);
        assert!(!tracker.is_long_press(start + THRESHOLD));
        assert!(tracker.is_long_press(start + THRESHOLD + Duration::from_millis(1)));
    }

    #[test]
    fn reset_forgets_the_press() {
        let mut tracker = HoldTracker::new(THRESHOLD);
        let start = Instant::now();
        tracker.set(start);
        tracker.reset();
        assert!(!tracker.is_set());
        assert!(!tracker.is_long_press(start + THRESHOLD * 2));
    }

    #[test]
    fn repeated_set_refreshes_the_timestamp() {
        let mut tracker = HoldTracker::new(THRESHOLD);
        let start = Instant::now();
        tracker.set(start);
        tracker.set(start + THRESHOLD);
        assert!(!tracker.is_long_press(start + THRESHOLD + Duration::from_millis(1)));
    }

    #[test]
    fn latch_fires_once() {
        let mut latch = ReleaseLatch::default();
        assert!(!latch.consume());
        latch.arm();
        assert!(latch.is_armed());
        assert!(latch.consume());
        assert!(!latch.is_armed());
        assert!(!latch.consume());
    }
}
