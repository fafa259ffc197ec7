//! Session Statistics
//!
//! Running totals for one scan session. Both counters only ever move up.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Every candidate fetched this session, including those below the floor
    pub scanned_count: u64,
    /// Best score seen this session, independent of the window cap
    pub highest_score: u32,
    /// Completed fetch cycles
    pub cycles: u64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one cycle into the totals.
    ///
    /// `candidate_count` is the pre-filter count; `scores` are the scores of
    /// every candidate in the cycle.
    pub fn record(&mut self, candidate_count: usize, scores: &[u32]) {
        self.scanned_count = self.scanned_count.saturating_add(candidate_count as u64);
        let cycle_max = scores.iter().copied().max().unwrap_or(0);
        self.highest_score = self.highest_score.max(cycle_max);
        self.cycles = self.cycles.saturating_add(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
