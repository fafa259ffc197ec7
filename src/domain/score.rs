//! Score Engine
//!
//! Heuristic 50-95 quality score for a freshly listed token:
//!
//! | Factor            | +15      | +10      | +7      | +5      |
//! |-------------------|----------|----------|---------|---------|
//! | Market cap (USD)  | > 50,000 | > 10,000 |         | > 5,000 |
//! | Replies           |          | > 100    | > 50    | > 20    |
//! | Age               |          | < 1h     | < 6h    | < 24h   |
//!
//! on top of a base of 50, plus a uniform market-noise term in [0, 10).
//! The noise comes from an injected [`NoiseSource`] so scoring stays a pure
//! function of (candidate, clock, noise draw).

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::token::{Action, Candidate, RiskTier, ScoredToken};

/// Starting score before any bonus
pub const BASE_SCORE: f64 = 50.0;
/// Lowest score the engine emits
pub const MIN_SCORE: u32 = 50;
/// Highest score the engine emits
pub const MAX_SCORE: u32 = 95;
/// Noise is drawn from [0, NOISE_SPAN)
pub const NOISE_SPAN: f64 = 10.0;
/// Default BUY threshold
pub const DEFAULT_BUY_THRESHOLD: u32 = 85;

/// Source of the market-noise term
pub trait NoiseSource: Send {
    /// Draw a value in [0, NOISE_SPAN)
    fn sample(&mut self) -> f64;
}

/// Uniform noise from a seedable generator
#[derive(Debug)]
pub struct SeededNoise {
    rng: StdRng,
}

impl SeededNoise {
    /// Seeded generator, or entropy-seeded when `seed` is `None`
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl NoiseSource for SeededNoise {
    fn sample(&mut self) -> f64 {
        self.rng.gen_range(0.0..NOISE_SPAN)
    }
}

/// Constant noise. `FixedNoise::zero()` makes scoring fully deterministic.
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise(f64);

impl FixedNoise {
    /// Constant draw, clamped into [0, NOISE_SPAN)
    pub fn new(value: f64) -> Self {
        let value = if value.is_finite() { value } else { 0.0 };
        Self(value.clamp(0.0, NOISE_SPAN - f64::EPSILON * NOISE_SPAN))
    }

    pub fn zero() -> Self {
        Self(0.0)
    }
}

impl NoiseSource for FixedNoise {
    fn sample(&mut self) -> f64 {
        self.0
    }
}

/// Bonus for market depth, highest tier first
pub fn market_cap_bonus(usd: f64) -> f64 {
    if usd > 50_000.0 {
        15.0
    } else if usd > 10_000.0 {
        10.0
    } else if usd > 5_000.0 {
        5.0
    } else {
        0.0
    }
}

/// Bonus for community activity, highest tier first
pub fn community_bonus(replies: f64) -> f64 {
    if replies > 100.0 {
        10.0
    } else if replies > 50.0 {
        7.0
    } else if replies > 20.0 {
        5.0
    } else {
        0.0
    }
}

/// Bonus for recency; unknown age counts as infinitely old
pub fn recency_bonus(age_hours: Option<f64>) -> f64 {
    match age_hours {
        Some(age) if age < 1.0 => 10.0,
        Some(age) if age < 6.0 => 7.0,
        Some(age) if age < 24.0 => 5.0,
        _ => 0.0,
    }
}

/// Scores candidates and classifies them
pub struct ScoreEngine {
    buy_threshold: u32,
    noise: Box<dyn NoiseSource>,
}

impl std::fmt::Debug for ScoreEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreEngine")
            .field("buy_threshold", &self.buy_threshold)
            .finish_non_exhaustive()
    }
}

impl ScoreEngine {
    pub fn new(buy_threshold: u32, noise: Box<dyn NoiseSource>) -> Self {
        Self {
            buy_threshold,
            noise,
        }
    }

    /// Engine with the default BUY threshold and zero noise
    pub fn deterministic() -> Self {
        Self::new(DEFAULT_BUY_THRESHOLD, Box::new(FixedNoise::zero()))
    }

    pub fn buy_threshold(&self) -> u32 {
        self.buy_threshold
    }

    /// Score against the wall clock
    pub fn score(&mut self, candidate: &Candidate) -> ScoredToken {
        self.score_at(candidate, Utc::now())
    }

    /// Score with an explicit clock
    pub fn score_at(&mut self, candidate: &Candidate, now: DateTime<Utc>) -> ScoredToken {
        let raw = BASE_SCORE
            + market_cap_bonus(candidate.market_cap_usd)
            + community_bonus(candidate.reply_count)
            + recency_bonus(candidate.age_hours(now))
            + self.noise.sample();

        let score = raw
            .clamp(MIN_SCORE as f64, MAX_SCORE as f64)
            .round() as u32;

        ScoredToken {
            mint: candidate.mint.clone(),
            name: candidate.name.clone(),
            symbol: candidate.symbol.clone(),
            score,
            action: self.action_for(score),
            risk_tier: RiskTier::from_score(score),
            market_cap_usd: candidate.market_cap_usd,
            reply_count: candidate.reply_count,
        }
    }

    /// BUY at or above the threshold, WATCH otherwise
    pub fn action_for(&self, score: u32) -> Action {
        if score >= self.buy_threshold {
            Action::Buy
        } else {
            Action::Watch
        }
    }
}
