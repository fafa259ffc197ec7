//! Configuration Loader
//!
//! Loads and validates configuration from TOML files. Every section and key
//! is optional; missing values fall back to the documented defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapters::pump_fun::{
    parse_feed_url, DEFAULT_BATCH_LIMIT, DEFAULT_FEED_URL, DEFAULT_TIMEOUT_SECS, MAX_BATCH_LIMIT,
};
use crate::domain::score::{DEFAULT_BUY_THRESHOLD, MAX_SCORE, MIN_SCORE};
use crate::domain::window::{DEFAULT_WINDOW_CAP, MAX_WINDOW_CAP};

/// Environment variable overriding `feed.url`
pub const FEED_URL_ENV: &str = "PUMPFUN_API_URL";

/// Longest accepted poll interval (one day)
pub const MAX_POLL_INTERVAL_SECS: u64 = 86_400;
/// Longest accepted session lifetime (one day)
pub const MAX_LIFETIME_SECS: u64 = 86_400;
/// Longest accepted request timeout
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedSection,
    pub session: SessionSection,
    pub scoring: ScoringSection,
    pub logging: LoggingSection,
}

/// Which token source backs the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    #[default]
    PumpFun,
    Synthetic,
}

/// Token feed section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSection {
    /// Feed strategy
    pub kind: FeedKind,
    /// pump.fun coins endpoint
    pub url: String,
    /// Newest listings considered per fetch
    pub batch_limit: usize,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Seed for the synthetic feed
    pub seed: Option<u64>,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            kind: FeedKind::PumpFun,
            url: DEFAULT_FEED_URL.to_string(),
            batch_limit: DEFAULT_BATCH_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            seed: None,
        }
    }
}

impl FeedSection {
    /// Get feed URL with environment variable override
    /// Checks PUMPFUN_API_URL env var first, falls back to config value
    pub fn get_url(&self) -> String {
        std::env::var(FEED_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.url.clone())
    }
}

/// Scan session timing section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Seconds between fetch cycles
    pub poll_interval_secs: u64,
    /// Total session lifetime in seconds
    pub lifetime_secs: u64,
    /// Maximum tokens kept in the window
    pub window_cap: usize,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
            lifetime_secs: 60,
            window_cap: DEFAULT_WINDOW_CAP,
        }
    }
}

/// Scoring section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    /// Minimum score to enter the window
    pub score_floor: u32,
    /// Score at or above which a token is a BUY
    pub buy_threshold: u32,
    /// Add the random market-noise term
    pub noise: bool,
    /// Seed for the noise term; entropy when absent
    pub noise_seed: Option<u64>,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            score_floor: 70,
            buy_threshold: DEFAULT_BUY_THRESHOLD,
            noise: true,
            noise_seed: None,
        }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(content)?;
    config.feed.url = config.feed.get_url();
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Feed
        if self.feed.kind == FeedKind::PumpFun {
            parse_feed_url(&self.feed.url)
                .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        }

        if !(1..=MAX_BATCH_LIMIT).contains(&self.feed.batch_limit) {
            return Err(ConfigError::ValidationError(format!(
                "batch_limit must be 1-{}, got {}",
                MAX_BATCH_LIMIT, self.feed.batch_limit
            )));
        }

        if !(1..=MAX_TIMEOUT_SECS).contains(&self.feed.timeout_secs) {
            return Err(ConfigError::ValidationError(format!(
                "timeout_secs must be 1-{}, got {}",
                MAX_TIMEOUT_SECS, self.feed.timeout_secs
            )));
        }

        // Session
        if !(1..=MAX_POLL_INTERVAL_SECS).contains(&self.session.poll_interval_secs) {
            return Err(ConfigError::ValidationError(format!(
                "poll_interval_secs must be 1-{}, got {}",
                MAX_POLL_INTERVAL_SECS, self.session.poll_interval_secs
            )));
        }

        if !(1..=MAX_LIFETIME_SECS).contains(&self.session.lifetime_secs) {
            return Err(ConfigError::ValidationError(format!(
                "lifetime_secs must be 1-{}, got {}",
                MAX_LIFETIME_SECS, self.session.lifetime_secs
            )));
        }

        if !(1..=MAX_WINDOW_CAP).contains(&self.session.window_cap) {
            return Err(ConfigError::ValidationError(format!(
                "window_cap must be 1-{}, got {}",
                MAX_WINDOW_CAP, self.session.window_cap
            )));
        }

        // Scoring
        let score_range = MIN_SCORE..=MAX_SCORE;
        if !score_range.contains(&self.scoring.score_floor) {
            return Err(ConfigError::ValidationError(format!(
                "score_floor must be {}-{}, got {}",
                MIN_SCORE, MAX_SCORE, self.scoring.score_floor
            )));
        }

        if !score_range.contains(&self.scoring.buy_threshold) {
            return Err(ConfigError::ValidationError(format!(
                "buy_threshold must be {}-{}, got {}",
                MIN_SCORE, MAX_SCORE, self.scoring.buy_threshold
            )));
        }

        if self.scoring.buy_threshold < self.scoring.score_floor {
            return Err(ConfigError::ValidationError(format!(
                "buy_threshold ({}) must be >= score_floor ({})",
                self.scoring.buy_threshold, self.scoring.score_floor
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_valid_config() -> String {
        r#"
[feed]
kind = "pump_fun"
url = "https://frontend-api.pump.fun/coins"
batch_limit = 20
timeout_secs = 10

[session]
poll_interval_secs = 5
lifetime_secs = 60
window_cap = 10

[scoring]
score_floor = 70
buy_threshold = 85
noise = true
noise_seed = 7

[logging]
level = "debug"
"#
        .to_string()
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(create_valid_config().as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.feed.kind, FeedKind::PumpFun);
        assert_eq!(config.feed.batch_limit, 20);
        assert_eq!(config.session.poll_interval_secs, 5);
        assert_eq!(config.session.window_cap, 10);
        assert_eq!(config.scoring.noise_seed, Some(7));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/path/config.toml");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.feed.kind, FeedKind::PumpFun);
        assert_eq!(config.feed.batch_limit, 20);
        assert_eq!(config.session.poll_interval_secs, 30);
        assert_eq!(config.session.lifetime_secs, 60);
        assert_eq!(config.session.window_cap, 50);
        assert_eq!(config.scoring.score_floor, 70);
        assert_eq!(config.scoring.buy_threshold, 85);
        assert!(config.scoring.noise);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_section() {
        let config = parse_config("[session]\nlifetime_secs = 120\n").unwrap();
        assert_eq!(config.session.lifetime_secs, 120);
        assert_eq!(config.session.poll_interval_secs, 30);
    }

    #[test]
    fn test_synthetic_kind() {
        let config = parse_config("[feed]\nkind = \"synthetic\"\nseed = 3\n").unwrap();
        assert_eq!(config.feed.kind, FeedKind::Synthetic);
        assert_eq!(config.feed.seed, Some(3));
    }

    #[test]
    fn test_invalid_toml() {
        let result = parse_config("[session\npoll_interval_secs = ");
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_malformed_url_rejected() {
        let mut config = Config::default();
        config.feed.url = "frontend-api.pump.fun/coins".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        // The synthetic feed never touches the URL
        config.feed.kind = FeedKind::Synthetic;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_durations_rejected() {
        let mut config = Config::default();
        config.session.poll_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.session.lifetime_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.session.window_cap = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.feed.batch_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_values_rejected() {
        let result = parse_config("[session]\nlifetime_secs = 9223372036854775807\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let result = parse_config("[session]\npoll_interval_secs = 9223372036854775807\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let result = parse_config("[session]\nwindow_cap = 9223372036854775807\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let result = parse_config("[feed]\nbatch_limit = 9223372036854775807\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let result = parse_config("[feed]\ntimeout_secs = 9223372036854775807\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_upper_bounds_inclusive() {
        let mut config = Config::default();
        config.session.poll_interval_secs = MAX_POLL_INTERVAL_SECS;
        config.session.lifetime_secs = MAX_LIFETIME_SECS;
        config.session.window_cap = MAX_WINDOW_CAP;
        config.feed.batch_limit = MAX_BATCH_LIMIT;
        config.feed.timeout_secs = MAX_TIMEOUT_SECS;
        assert!(config.validate().is_ok());

        config.session.lifetime_secs = MAX_LIFETIME_SECS + 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("lifetime_secs"));
    }

    #[test]
    fn test_score_thresholds_validated() {
        let mut config = Config::default();
        config.scoring.score_floor = 40;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scoring.buy_threshold = 99;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scoring.score_floor = 80;
        config.scoring.buy_threshold = 75;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("buy_threshold"));
    }
}
