//! Elapsed-time checkpoints
//!
//! Each checkpoint records the time elapsed since the previous one; the
//! tracker never resets, so the checkpoint durations always sum to the total
//! tracked time.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// One serialized checkpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingEntry {
    pub step: String,
    pub elapsed_ms: u64,
}

/// Cumulative checkpoint tracker
#[derive(Debug)]
pub struct TimeTracker {
    start: Instant,
    last: Instant,
    checkpoints: Vec<(String, Duration)>,
}

impl TimeTracker {
    /// Start tracking now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            checkpoints: Vec::new(),
        }
    }

    /// Record a checkpoint: the time elapsed since the previous one
    pub fn next(&mut self, step: impl Into<String>) -> Duration {
        let now = Instant::now();
        let elapsed = now - self.last;
        self.last = now;
        self.checkpoints.push((step.into(), elapsed));
        elapsed
    }

    /// Total time covered by the recorded checkpoints
    pub fn total(&self) -> Duration {
        self.last - self.start
    }

    /// The recorded checkpoints as serializable entries
    pub fn entries(&self) -> Vec<TimingEntry> {
        self.checkpoints
            .iter()
            .map(|(step, elapsed)| TimingEntry {
                step: step.clone(),
                elapsed_ms: elapsed.as_millis() as u64,
            })
            .collect()
    }
}

impl Default for TimeTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoints_sum_to_total() {
        let mut tracker = TimeTracker::new();
        std::thread::sleep(Duration::from_millis(2));
        tracker.next("first");
        std::thread::sleep(Duration::from_millis(2));
        tracker.next("second");

        let sum: Duration = tracker.checkpoints.iter().map(|(_, d)| *d).sum();
        assert_eq!(sum, tracker.total());
        assert_eq!(tracker.entries().len(), 2);
        assert_eq!(tracker.entries()[0].step, "first");
    }

    #[test]
    fn test_checkpoints_never_reset() {
        let mut tracker = TimeTracker::new();
        let first = tracker.next("a");
        std::thread::sleep(Duration::from_millis(2));
        let second = tracker.next("b");
        // The second checkpoint measures from the first, not from the start
        assert!(second >= Duration::from_millis(2));
        let _ = first;
        assert_eq!(tracker.checkpoints.len(), 2);
    }
}
