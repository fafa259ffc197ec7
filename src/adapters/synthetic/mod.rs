//! Synthetic Feed Adapter
//!
//! Offline stand-in for the pump.fun feed, used for demos and dry runs.
//! Seed it for reproducible sessions.

mod feed;

pub use feed::{SyntheticFeed, SyntheticFeedConfig};
