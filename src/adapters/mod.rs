//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Pump.fun: HTTP coins feed client
//! - Synthetic: Seedable offline feed for demos and dry runs
//! - CLI: Command-line interface definitions

pub mod pump_fun;
pub mod synthetic;
pub mod cli;

use std::sync::Arc;

use crate::config::{FeedKind, FeedSection};
use crate::ports::TokenSource;

pub use cli::CliApp;
pub use pump_fun::{FeedError, PumpFunFeed, PumpFunFeedConfig};
pub use synthetic::{SyntheticFeed, SyntheticFeedConfig};

/// Build the token source selected by the feed section
pub fn build_source(feed: &FeedSection) -> Result<Arc<dyn TokenSource>, FeedError> {
    match feed.kind {
        FeedKind::PumpFun => {
            let client = PumpFunFeed::new(PumpFunFeedConfig {
                url: feed.url.clone(),
                batch_limit: feed.batch_limit,
                timeout_secs: feed.timeout_secs,
            })?;
            Ok(Arc::new(client))
        }
        FeedKind::Synthetic => Ok(Arc::new(SyntheticFeed::new(SyntheticFeedConfig {
            batch_limit: feed.batch_limit,
            seed: feed.seed,
            ..Default::default()
        }))),
    }
}
