//! Synthetic Launch Feed
//!
//! Generates plausible pump.fun-style listings from a seedable RNG. Keeps a
//! rolling pool of recent launches so consecutive fetches overlap the way
//! the live feed does.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::domain::Candidate;
use crate::ports::TokenSource;

const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const MINT_LEN: usize = 44;

const PREFIXES: &[&str] = &[
    "Baby", "Based", "Turbo", "Giga", "Moon", "Degen", "Super", "Tiny", "Sad", "Happy",
];
const ROOTS: &[&str] = &[
    "Pepe", "Doge", "Frog", "Cat", "Bonk", "Wif", "Shiba", "Hamster", "Penguin", "Goat",
];

/// Probability that a generated listing has no timestamp
const UNDATED_PROBABILITY: f64 = 0.05;
/// Oldest generated listing, in seconds
const MAX_LISTING_AGE_SECS: i64 = 36 * 3600;

/// Synthetic feed configuration
#[derive(Debug, Clone)]
pub struct SyntheticFeedConfig {
    /// Newest listings returned per fetch
    pub batch_limit: usize,
    /// Upper bound of new listings per fetch (at least one is always added)
    pub max_new_per_fetch: usize,
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SyntheticFeedConfig {
    fn default() -> Self {
        Self {
            batch_limit: 20,
            max_new_per_fetch: 5,
            seed: None,
        }
    }
}

#[derive(Debug)]
struct FeedState {
    rng: StdRng,
    pool: VecDeque<Candidate>,
}

/// Token source producing generated listings
#[derive(Debug)]
pub struct SyntheticFeed {
    config: SyntheticFeedConfig,
    state: Mutex<FeedState>,
}

impl SyntheticFeed {
    pub fn new(config: SyntheticFeedConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            state: Mutex::new(FeedState {
                rng,
                pool: VecDeque::new(),
            }),
            config,
        }
    }

    /// List new tokens and return the newest batch
    pub fn next_batch(&self) -> Vec<Candidate> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let FeedState { rng, pool } = &mut *state;

        let new_count = if pool.is_empty() {
            self.config.batch_limit
        } else {
            rng.gen_range(1..=self.config.max_new_per_fetch.max(1))
        };

        for _ in 0..new_count {
            pool.push_front(generate_listing(rng));
        }
        pool.truncate(self.config.batch_limit.saturating_mul(2));

        trace!(new = new_count, pool = pool.len(), "Synthetic feed listed tokens");

        pool.iter().take(self.config.batch_limit).cloned().collect()
    }
}

fn generate_mint(rng: &mut StdRng) -> String {
    (0..MINT_LEN)
        .map(|_| BASE58_ALPHABET[rng.gen_range(0..BASE58_ALPHABET.len())] as char)
        .collect()
}

fn generate_listing(rng: &mut StdRng) -> Candidate {
    let prefix = PREFIXES.choose(rng).copied().unwrap_or("Moon");
    let root = ROOTS.choose(rng).copied().unwrap_or("Pepe");
    let name = format!("{} {}", prefix, root);
    let symbol: String = format!("{}{}", &prefix[..1], root).to_uppercase().chars().take(6).collect();

    // Most launches are tiny; a few take off
    let market_cap_usd: f64 = if rng.gen_bool(0.2) {
        rng.gen_range(10_000.0..120_000.0)
    } else {
        rng.gen_range(500.0..12_000.0)
    };
    let reply_count = rng.gen_range(0..=180) as f64;

    let mut candidate = Candidate::new(generate_mint(rng), name, symbol)
        .with_market_cap(market_cap_usd.round())
        .with_replies(reply_count);

    if !rng.gen_bool(UNDATED_PROBABILITY) {
        let age = Duration::seconds(rng.gen_range(0..=MAX_LISTING_AGE_SECS));
        candidate = candidate.with_created_at(Utc::now() - age);
    }

    candidate
}

#[async_trait]
impl TokenSource for SyntheticFeed {
    async fn fetch(&self) -> Vec<Candidate> {
        self.next_batch()
    }

    fn label(&self) -> &'static str {
        "synthetic"
    }
}
