//! Pump.fun Feed Client
//!
//! Polls the pump.fun coins endpoint over HTTP and normalizes the newest
//! listings into candidates.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::types::{normalize_batch, NormalizedBatch};
use crate::domain::Candidate;
use crate::ports::TokenSource;

/// Default coins endpoint
pub const DEFAULT_FEED_URL: &str = "https://frontend-api.pump.fun/coins";
/// Default number of newest listings considered per fetch
pub const DEFAULT_BATCH_LIMIT: usize = 20;
/// Largest accepted batch limit
pub const MAX_BATCH_LIMIT: usize = 1_000;
/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors from a single feed request
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Invalid feed URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed returned status: {0}")]
    Status(reqwest::StatusCode),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Feed client configuration
#[derive(Debug, Clone)]
pub struct PumpFunFeedConfig {
    /// Coins endpoint
    pub url: String,
    /// Newest records kept per fetch
    pub batch_limit: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PumpFunFeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            batch_limit: DEFAULT_BATCH_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Parse and check a feed endpoint
pub fn parse_feed_url(url: &str) -> Result<Url, FeedError> {
    let parsed = Url::parse(url).map_err(|e| FeedError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FeedError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// HTTP-backed token source for pump.fun
#[derive(Debug, Clone)]
pub struct PumpFunFeed {
    http_client: Client,
    url: Url,
    batch_limit: usize,
}

impl PumpFunFeed {
    /// Create a feed client. Fails on a malformed endpoint.
    pub fn new(config: PumpFunFeedConfig) -> Result<Self, FeedError> {
        let url = parse_feed_url(&config.url)?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            url,
            batch_limit: config.batch_limit,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn batch_limit(&self) -> usize {
        self.batch_limit
    }

    /// One request against the feed, with errors surfaced
    pub async fn fetch_coins(&self) -> Result<NormalizedBatch, FeedError> {
        let response = self.http_client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.text().await?;
        let records: Vec<Value> =
            serde_json::from_str(&body).map_err(|e| FeedError::Parse(e.to_string()))?;

        Ok(normalize_batch(records, self.batch_limit))
    }
}

#[async_trait]
impl TokenSource for PumpFunFeed {
    async fn fetch(&self) -> Vec<Candidate> {
        match self.fetch_coins().await {
            Ok(batch) => {
                if batch.unidentified > 0 {
                    debug!(
                        dropped = batch.unidentified,
                        "Dropped pump.fun records without a mint"
                    );
                }
                batch.candidates
            }
            Err(FeedError::Status(status)) => {
                warn!(%status, url = %self.url, "pump.fun feed returned non-success status");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, url = %self.url, "pump.fun fetch failed");
                Vec::new()
            }
        }
    }

    fn label(&self) -> &'static str {
        "pump.fun"
    }
}
