//! The `check` and `track` flows: fetch, parse, compute, record, render.

use chrono::{DateTime, Utc};

use crate::error::UsageError;
use crate::gh_usage::UsageSource;
use crate::report;
use crate::usage::{
    compute_usage_stats, parse_usage_payload, DailyCache, HistoryLog, UsageSnapshot,
};
use crate::usage_paths::UsagePaths;

fn fetch_snapshot(
    source: &impl UsageSource,
    now: DateTime<Utc>,
) -> Result<UsageSnapshot, UsageError> {
    let payload = source.fetch()?;
    let snapshot = parse_usage_payload(&payload, now.date_naive())?;
    tracing::debug!(
        login = %snapshot.login,
        plan = %snapshot.plan,
        limit = snapshot.limit,
        remaining = snapshot.remaining,
        percent_remaining = snapshot.percent_remaining,
        unlimited = snapshot.unlimited,
        "Fetched usage snapshot"
    );
    Ok(snapshot)
}

/// Reports current usage, diffing against the same-day cache for "used today".
///
/// Unlimited plans skip the cache entirely.
pub fn run_check(
    source: &impl UsageSource,
    paths: &UsagePaths,
    now: DateTime<Utc>,
    color: bool,
) -> Result<String, UsageError> {
    let snapshot = fetch_snapshot(source, now)?;

    let used_today = if snapshot.unlimited {
        0
    } else {
        let cache = DailyCache::new(&paths.cache_path);
        tracing::debug!("Using same-day cache {}", cache.path().display());
        cache.compute_used_today(now.date_naive(), snapshot.remaining)
    };

    let stats = compute_usage_stats(&snapshot, used_today, now);
    tracing::debug!(status = %stats.status, daily_budget = stats.daily_budget, "Computed usage");

    Ok(report::format_check_report(&snapshot, &stats, color))
}

/// Appends a reading to the history log and reports the change since the last one.
pub fn run_track(
    source: &impl UsageSource,
    paths: &UsagePaths,
    now: DateTime<Utc>,
    color: bool,
) -> Result<String, UsageError> {
    let snapshot = fetch_snapshot(source, now)?;
    let stats = compute_usage_stats(&snapshot, 0, now);

    let history = HistoryLog::new(&paths.history_path);
    tracing::debug!("Using history file {}", history.path().display());
    let outcome = history.append(&snapshot, &stats, now)?;
    if let Some(previous) = &outcome.previous {
        tracing::debug!(
            previous_used = previous.used,
            previous_remaining = previous.remaining,
            "Previous history row at {}",
            previous.timestamp
        );
    }

    Ok(report::format_track_report(
        &snapshot, &stats, &outcome, now, color,
    ))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
