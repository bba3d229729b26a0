//! Append-only CSV history of `track` invocations.
//!
//! The file starts with [`HISTORY_HEADER`]; each row is one reading. Fields are
//! comma-joined without quoting, so plan names must not contain commas.

use super::snapshot::UsageSnapshot;
use super::stats::UsageComputation;
use crate::error::UsageError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Timelike, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const HISTORY_HEADER: &str = "timestamp,limit,used,remaining,percent_used,days_until_reset,plan";

/// The last row already in the log when a new reading is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviousRecord {
    pub timestamp: DateTime<Utc>,
    pub used: u64,
    pub remaining: u64,
}

/// Result of appending a reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    /// The row exactly as written, without the trailing newline
    pub record: String,
    pub previous: Option<PreviousRecord>,
}

/// Formats a timestamp the way history rows store it: `+00:00` offset,
/// microseconds only when non-zero, anything finer truncated.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    let timestamp = timestamp.trunc_subsecs(6);
    let precision = if timestamp.nanosecond() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    timestamp.to_rfc3339_opts(precision, false)
}

/// Parses a stored timestamp. Naive timestamps are taken as UTC, and a bare
/// date means midnight.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(aware) = DateTime::parse_from_rfc3339(raw) {
        return Some(aware.with_timezone(&Utc));
    }
    [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    .or_else(|| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|date| date.and_time(chrono::NaiveTime::MIN))
    })
    .map(|naive| naive.and_utc())
}

/// Formats one history row.
pub fn format_record(
    snapshot: &UsageSnapshot,
    stats: &UsageComputation,
    now: DateTime<Utc>,
) -> String {
    [
        format_timestamp(now),
        snapshot.limit.to_string(),
        snapshot.used().to_string(),
        snapshot.remaining.to_string(),
        format!("{:.1}", stats.usage_pct),
        format!("{:.1}", stats.days_until_reset),
        snapshot.plan.clone(),
    ]
    .join(",")
}

/// Parses the last data row of a history file. Any malformed content,
/// including a header-only file, yields `None`.
pub fn parse_last_record(content: &str) -> Option<PreviousRecord> {
    let lines: Vec<&str> = content.trim().lines().collect();
    if lines.len() < 2 || !lines.first()?.starts_with("timestamp") {
        return None;
    }

    let fields: Vec<&str> = lines.last()?.split(',').collect();
    let timestamp = parse_timestamp(fields.first()?)?;
    let used = fields.get(2)?.trim().parse().ok()?;
    let remaining = fields.get(3)?.trim().parse().ok()?;

    Some(PreviousRecord {
        timestamp,
        used,
        remaining,
    })
}

#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the most recent row, if one can be parsed.
    pub fn last_record(&self) -> Option<PreviousRecord> {
        let content = fs::read_to_string(&self.path).ok()?;
        let previous = parse_last_record(&content);
        if previous.is_none() && content.lines().count() > 1 {
            tracing::warn!(
                "Could not parse last row of history file {}",
                self.path.display()
            );
        }
        previous
    }

    /// Appends a reading, creating the file and its header if needed.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::Storage`] if the parent directory or the file
    /// cannot be created or written.
    pub fn append(
        &self,
        snapshot: &UsageSnapshot,
        stats: &UsageComputation,
        now: DateTime<Utc>,
    ) -> Result<AppendOutcome, UsageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| UsageError::storage(parent, e))?;
        }

        let previous = if self.path.exists() {
            self.last_record()
        } else {
            fs::write(&self.path, format!("{}\n", HISTORY_HEADER))
                .map_err(|e| UsageError::storage(&self.path, e))?;
            None
        };

        let record = format_record(snapshot, stats, now);
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| UsageError::storage(&self.path, e))?;
        writeln!(file, "{}", record).map_err(|e| UsageError::storage(&self.path, e))?;

        tracing::debug!("Appended history row to {}", self.path.display());
        Ok(AppendOutcome { record, previous })
    }
}

#[cfg(test)]
#[path = "tests/history_tests.rs"]
mod tests;
