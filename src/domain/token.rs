//! Token Types
//!
//! Raw launch candidates as they come off a feed, and the scored form the
//! session keeps in its window.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score at or above which a token is rated low risk
pub const LOW_RISK_FROM: u32 = 85;
/// Score below which a token is rated high risk
pub const HIGH_RISK_BELOW: u32 = 70;

/// A newly listed token before scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Token mint address, unique per token
    pub mint: String,
    /// Display name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Market depth in USD (pump.fun `usd_market_cap`), 0 when unknown
    pub market_cap_usd: f64,
    /// Community activity (pump.fun `reply_count`), 0 when unknown
    pub reply_count: f64,
    /// Listing time; `None` is scored as infinitely old
    pub created_at: Option<DateTime<Utc>>,
}

impl Candidate {
    /// Create a candidate with no market data
    pub fn new(mint: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            mint: mint.into(),
            name: name.into(),
            symbol: symbol.into(),
            market_cap_usd: 0.0,
            reply_count: 0.0,
            created_at: None,
        }
    }

    pub fn with_market_cap(mut self, usd: f64) -> Self {
        self.market_cap_usd = usd;
        self
    }

    pub fn with_replies(mut self, replies: f64) -> Self {
        self.reply_count = replies;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Age in hours at `now`, `None` when the listing time is unknown
    pub fn age_hours(&self, now: DateTime<Utc>) -> Option<f64> {
        self.created_at
            .map(|created| (now - created).num_milliseconds() as f64 / 3_600_000.0)
    }
}

/// Recommended action for a scored token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Watch,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Watch => write!(f, "WATCH"),
        }
    }
}

/// Risk classification derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Classify a score. Covers the whole score range with no gaps.
    pub fn from_score(score: u32) -> Self {
        if score < HIGH_RISK_BELOW {
            RiskTier::High
        } else if score < LOW_RISK_FROM {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Low => write!(f, "Low"),
            RiskTier::Medium => write!(f, "Medium"),
            RiskTier::High => write!(f, "High"),
        }
    }
}

/// A candidate after scoring, as shown in the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredToken {
    /// Token mint address, the window's dedup key
    pub mint: String,
    pub name: String,
    pub symbol: String,
    /// Heuristic quality score, 50..=95
    pub score: u32,
    pub action: Action,
    pub risk_tier: RiskTier,
    /// Carried through for display only
    pub market_cap_usd: f64,
    /// Carried through for display only
    pub reply_count: f64,
}

impl ScoredToken {
    pub fn is_buy(&self) -> bool {
        self.action == Action::Buy
    }
}
