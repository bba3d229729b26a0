//! Single-record cache used to work out how many requests were used today.
//!
//! The API only reports the cumulative remaining count, so each `check` run
//! stores `(date, remaining)` and the next run on the same UTC date diffs
//! against it. The file holds two lines: an ISO date and the remaining count.
//!
//! Read-then-write is not atomic; two concurrent runs may race.

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// What the cache file held before this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachedRemaining {
    Present { date: NaiveDate, remaining: u64 },
    /// Missing, unreadable or malformed.
    Absent,
}

impl CachedRemaining {
    /// Parses the two-line cache format. Anything else is `Absent`.
    pub fn parse(content: &str) -> Self {
        let lines: Vec<&str> = content.lines().collect();
        let [date_line, remaining_line] = lines.as_slice() else {
            return CachedRemaining::Absent;
        };

        let date = NaiveDate::parse_from_str(date_line.trim(), "%Y-%m-%d");
        let remaining = remaining_line.trim().parse::<u64>();
        match (date, remaining) {
            (Ok(date), Ok(remaining)) => CachedRemaining::Present { date, remaining },
            _ => CachedRemaining::Absent,
        }
    }

    /// Requests used since the cached record, if it is from `today`.
    ///
    /// Clamped at zero so a quota increase never reads as negative usage.
    pub fn used_since(&self, today: NaiveDate, remaining: u64) -> u64 {
        match *self {
            CachedRemaining::Present {
                date,
                remaining: cached,
            } if date == today => cached.saturating_sub(remaining),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DailyCache {
    path: PathBuf,
}

impl DailyCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> CachedRemaining {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let cached = CachedRemaining::parse(&content);
                if cached == CachedRemaining::Absent {
                    tracing::warn!(
                        "Ignoring malformed usage cache at {}",
                        self.path.display()
                    );
                }
                cached
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CachedRemaining::Absent,
            Err(e) => {
                tracing::warn!(
                    "Could not read usage cache {}: {}",
                    self.path.display(),
                    e
                );
                CachedRemaining::Absent
            }
        }
    }

    pub fn store(&self, date: NaiveDate, remaining: u64) -> std::io::Result<()> {
        fs::write(&self.path, format!("{}\n{}\n", date.format("%Y-%m-%d"), remaining))
    }

    /// Returns requests used today and overwrites the cache with the current
    /// reading. A failed write is logged and does not affect the result.
    pub fn compute_used_today(&self, today: NaiveDate, remaining: u64) -> u64 {
        let used_today = self.load().used_since(today, remaining);

        if let Err(e) = self.store(today, remaining) {
            tracing::warn!(
                "Failed to update usage cache {}: {}",
                self.path.display(),
                e
            );
        }

        tracing::debug!(used_today, remaining, "Reconciled same-day usage");
        used_today
    }
}

#[cfg(test)]
#[path = "tests/daily_cache_tests.rs"]
mod tests;
