//! Pump.fun Types
//!
//! The coins endpoint returns loosely-typed records: fields go missing,
//! numbers sometimes arrive as strings, and older mirrors use `address`
//! instead of `mint`. Records are read as raw JSON and normalized here.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::Candidate;

/// Display name used when a record has none
pub const UNKNOWN_NAME: &str = "Unknown Token";
/// Symbol used when a record has none
pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";

/// Field names on a pump.fun coin record
mod field {
    pub const MINT: &str = "mint";
    pub const ADDRESS: &str = "address";
    pub const NAME: &str = "name";
    pub const SYMBOL: &str = "symbol";
    pub const USD_MARKET_CAP: &str = "usd_market_cap";
    pub const REPLY_COUNT: &str = "reply_count";
    pub const CREATED_TIMESTAMP: &str = "created_timestamp";
}

/// Result of normalizing one feed response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    /// Records that carried a usable mint
    pub candidates: Vec<Candidate>,
    /// Records dropped because no mint could be resolved
    pub unidentified: usize,
}

/// Keep the first `limit` records and normalize them
pub fn normalize_batch(mut records: Vec<Value>, limit: usize) -> NormalizedBatch {
    records.truncate(limit);

    let mut batch = NormalizedBatch::default();
    for record in &records {
        match normalize_record(record) {
            Some(candidate) => batch.candidates.push(candidate),
            None => batch.unidentified += 1,
        }
    }
    batch
}

/// Map one raw record into a candidate.
///
/// Returns `None` when the record has no mint or address; such tokens
/// cannot be told apart and are never scored.
pub fn normalize_record(record: &Value) -> Option<Candidate> {
    let mint = string_field(record, field::MINT).or_else(|| string_field(record, field::ADDRESS))?;

    Some(Candidate {
        mint,
        name: string_field(record, field::NAME).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        symbol: string_field(record, field::SYMBOL).unwrap_or_else(|| UNKNOWN_SYMBOL.to_string()),
        market_cap_usd: number_field(record, field::USD_MARKET_CAP).unwrap_or(0.0),
        reply_count: number_field(record, field::REPLY_COUNT).unwrap_or(0.0),
        created_at: number_field(record, field::CREATED_TIMESTAMP).and_then(millis_to_datetime),
    })
}

/// Non-empty string field, trimmed
fn string_field(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }
}

/// Finite numeric field, accepting JSON numbers or numeric strings
fn number_field(record: &Value, key: &str) -> Option<f64> {
    let value = match record.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Epoch milliseconds to UTC
fn millis_to_datetime(millis: f64) -> Option<DateTime<Utc>> {
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}
