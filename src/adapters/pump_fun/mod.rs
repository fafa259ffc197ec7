//! Pump.fun Adapter
//!
//! HTTP polling of the pump.fun coins endpoint for newly listed meme coins.
//!
//! # Overview
//!
//! `GET https://frontend-api.pump.fun/coins` returns a JSON array of coin
//! records, newest first. Each fetch keeps the newest `batch_limit`
//! records and maps them into [`Candidate`](crate::domain::Candidate)s:
//!
//! | Record field        | Candidate field  | Missing      |
//! |---------------------|------------------|--------------|
//! | `mint` / `address`  | `mint`           | record dropped |
//! | `name`              | `name`           | "Unknown Token" |
//! | `symbol`            | `symbol`         | "UNKNOWN"    |
//! | `usd_market_cap`    | `market_cap_usd` | 0            |
//! | `reply_count`       | `reply_count`    | 0            |
//! | `created_timestamp` | `created_at`     | infinitely old |
//!
//! # Example
//!
//! ```ignore
//! use meme_sniper::adapters::pump_fun::{PumpFunFeed, PumpFunFeedConfig};
//! use meme_sniper::ports::TokenSource;
//!
//! let feed = PumpFunFeed::new(PumpFunFeedConfig::default())?;
//! for candidate in feed.fetch().await {
//!     println!("{} ({}) - mcap: ${:.0}", candidate.name, candidate.symbol, candidate.market_cap_usd);
//! }
//! ```

mod client;
mod types;

pub use client::{
    parse_feed_url, FeedError, PumpFunFeed, PumpFunFeedConfig, DEFAULT_BATCH_LIMIT,
    DEFAULT_FEED_URL, DEFAULT_TIMEOUT_SECS, MAX_BATCH_LIMIT,
};
pub use types::{normalize_batch, normalize_record, NormalizedBatch, UNKNOWN_NAME, UNKNOWN_SYMBOL};
