//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    load_config, parse_config, Config, ConfigError, FeedKind, FeedSection, LoggingSection,
    ScoringSection, SessionSection, FEED_URL_ENV, MAX_LIFETIME_SECS, MAX_POLL_INTERVAL_SECS,
    MAX_TIMEOUT_SECS,
};
