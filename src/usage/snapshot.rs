//! Normalizes the raw `/copilot_internal/user` payload into a [`UsageSnapshot`].
//!
//! The API is loose about types: counts sometimes arrive as floats or strings,
//! and any field may be null. Everything except the quota section itself
//! falls back to a default instead of failing.

use crate::error::UsageError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const UNKNOWN: &str = "unknown";

/// Point-in-time read of the premium request quota.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSnapshot {
    pub login: String,
    pub plan: String,
    pub limit: u64,
    pub remaining: u64,
    /// Percentage of the quota still available (0-100)
    pub percent_remaining: f64,
    pub unlimited: bool,
    /// Quota resets at midnight UTC on this date
    pub reset_date: NaiveDate,
}

impl UsageSnapshot {
    /// Requests consumed so far. Never negative, even if the API reports
    /// more remaining than the limit.
    pub fn used(&self) -> u64 {
        self.limit.saturating_sub(self.remaining)
    }
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(default, deserialize_with = "lenient_text")]
    login: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    copilot_plan: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    quota_reset_date: Option<String>,
    #[serde(default)]
    quota_snapshots: Option<QuotaSnapshots>,
}

#[derive(Debug, Deserialize)]
struct QuotaSnapshots {
    #[serde(default)]
    premium_interactions: Option<RawQuota>,
}

#[derive(Debug, Deserialize)]
struct RawQuota {
    #[serde(default, deserialize_with = "lenient_count")]
    entitlement: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    remaining: u64,
    #[serde(default, deserialize_with = "lenient_float")]
    percent_remaining: f64,
    #[serde(default, deserialize_with = "lenient_truthy")]
    unlimited: bool,
}

/// Parses a usage payload.
///
/// `today` is the fallback reset date when the payload omits one.
///
/// # Errors
///
/// Returns [`UsageError::InvalidPayload`] if the premium quota section is
/// missing or the reset date is not an ISO-8601 date.
pub fn parse_usage_payload(payload: &Value, today: NaiveDate) -> Result<UsageSnapshot, UsageError> {
    let raw = RawPayload::deserialize(payload)
        .map_err(|e| UsageError::InvalidPayload(e.to_string()))?;

    let premium = raw
        .quota_snapshots
        .and_then(|snapshots| snapshots.premium_interactions)
        .ok_or_else(|| UsageError::InvalidPayload("missing premium_interactions".to_string()))?;

    let reset_date = match raw.quota_reset_date.as_deref() {
        Some(date) => parse_reset_date(date)?,
        None => today,
    };

    let mut snapshot = UsageSnapshot {
        login: raw.login.unwrap_or_else(|| UNKNOWN.to_string()),
        plan: raw.copilot_plan.unwrap_or_else(|| UNKNOWN.to_string()),
        limit: premium.entitlement,
        remaining: premium.remaining,
        percent_remaining: premium.percent_remaining,
        unlimited: premium.unlimited,
        reset_date,
    };

    // Unlimited plans have no quota to do math on
    if snapshot.unlimited {
        snapshot.limit = 0;
        snapshot.remaining = 0;
        if snapshot.percent_remaining == 0.0 {
            snapshot.percent_remaining = 100.0;
        }
    }

    Ok(snapshot)
}

fn parse_reset_date(raw: &str) -> Result<NaiveDate, UsageError> {
    let trimmed = raw.trim();
    // Full timestamps are accepted; only the calendar date matters.
    let date_part = trimmed.split('T').next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
        UsageError::InvalidPayload(format!("bad quota_reset_date '{}': {}", raw, e))
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string))
}

/// Null, negative or unparseable counts read as zero. Floats truncate.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let count = match &value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f.trunc() as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<f64>().map_or(0, |f| {
            if f > 0.0 {
                f.trunc() as u64
            } else {
                0
            }
        }),
        _ => 0,
    };
    Ok(count)
}

fn lenient_float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(parsed.filter(|f: &f64| f.is_finite()).unwrap_or(0.0))
}

fn lenient_truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let truthy = match &value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Null => false,
    };
    Ok(truthy)
}

#[cfg(test)]
#[path = "tests/snapshot_tests.rs"]
mod tests;
