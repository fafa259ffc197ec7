//! Signal Window
//!
//! Bounded, newest-first list of scored tokens with unique mints.

use std::collections::HashSet;

use super::token::ScoredToken;

/// Default maximum window size
pub const DEFAULT_WINDOW_CAP: usize = 50;
/// Largest accepted window size
pub const MAX_WINDOW_CAP: usize = 10_000;
/// Cap used by compact "live signals" views
pub const LIVE_SIGNALS_CAP: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct SignalWindow {
    cap: usize,
    tokens: Vec<ScoredToken>,
}

impl Default for SignalWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAP)
    }
}

impl SignalWindow {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            tokens: Vec::new(),
        }
    }

    /// Merge a fresh batch.
    ///
    /// Fresh tokens go in front, duplicates by mint are dropped keeping the
    /// first occurrence, and the result is truncated to the cap.
    pub fn merge(&mut self, fresh: Vec<ScoredToken>) {
        if fresh.is_empty() {
            return;
        }

        let mut seen = HashSet::with_capacity(fresh.len() + self.tokens.len());
        let previous = std::mem::take(&mut self.tokens);

        self.tokens = fresh
            .into_iter()
            .chain(previous)
            .filter(|token| seen.insert(token.mint.clone()))
            .take(self.cap)
            .collect();
    }

    pub fn tokens(&self) -> &[ScoredToken] {
        &self.tokens
    }

    pub fn to_vec(&self) -> Vec<ScoredToken> {
        self.tokens.clone()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn contains(&self, mint: &str) -> bool {
        self.tokens.iter().any(|t| t.mint == mint)
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::{Action, RiskTier};

    fn token(mint: &str, score: u32) -> ScoredToken {
        ScoredToken {
            mint: mint.to_string(),
            name: format!("{} Token", mint),
            symbol: mint.to_uppercase(),
            score,
            action: if score >= 85 { Action::Buy } else { Action::Watch },
            risk_tier: RiskTier::from_score(score),
            market_cap_usd: 0.0,
            reply_count: 0.0,
        }
    }

    fn mints(window: &SignalWindow) -> Vec<&str> {
        window.tokens().iter().map(|t| t.mint.as_str()).collect()
    }

    #[test]
    fn test_huge_cap_does_not_preallocate() {
        let mut window = SignalWindow::new(usize::MAX);
        assert!(window.is_empty());

        window.merge(vec![token("a", 80)]);
        assert_eq!(window.len(), 1);
        assert_eq!(window.cap(), usize::MAX);
    }

    #[test]
    fn test_newest_first() {
        let mut window = SignalWindow::new(50);
        window.merge(vec![token("a", 75), token("b", 80)]);
        window.merge(vec![token("c", 90)]);

        assert_eq!(mints(&window), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_duplicate_keeps_newest_entry() {
        let mut window = SignalWindow::new(50);
        window.merge(vec![token("x", 72), token("y", 71)]);
        window.merge(vec![token("x", 88)]);

        assert_eq!(mints(&window), vec!["x", "y"]);
        assert_eq!(window.tokens()[0].score, 88);
    }

    #[test]
    fn test_duplicates_within_one_batch() {
        let mut window = SignalWindow::new(50);
        window.merge(vec![token("x", 72), token("x", 91), token("z", 70)]);

        assert_eq!(mints(&window), vec!["x", "z"]);
        assert_eq!(window.tokens()[0].score, 72);
    }

    #[test]
    fn test_cap_enforced() {
        let mut window = SignalWindow::new(LIVE_SIGNALS_CAP);
        for cycle in 0..5 {
            let batch = (0..12).map(|i| token(&format!("c{}-{}", cycle, i), 75)).collect();
            window.merge(batch);
            assert!(window.len() <= LIVE_SIGNALS_CAP);
        }
        assert_eq!(window.len(), LIVE_SIGNALS_CAP);
        assert_eq!(window.tokens()[0].mint, "c4-0");
    }

    #[test]
    fn test_empty_merge_is_noop() {
        let mut window = SignalWindow::default();
        window.merge(vec![token("a", 70)]);
        let before = window.clone();

        window.merge(Vec::new());
        assert_eq!(window, before);
        assert_eq!(window.cap(), DEFAULT_WINDOW_CAP);
    }

    #[test]
    fn test_clear() {
        let mut window = SignalWindow::new(5);
        window.merge(vec![token("a", 70)]);
        assert!(window.contains("a"));

        window.clear();
        assert!(window.is_empty());
        assert!(!window.contains("a"));
    }
}
