//! Budget math: time left until reset, daily allowance, and hourly pacing.

use chrono::{DateTime, NaiveDate, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Working-hour profile used to turn a daily budget into an hourly pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacingTier {
    Conservative,
    Moderate,
    Focused,
}

impl PacingTier {
    pub const ALL: [PacingTier; 3] = [
        PacingTier::Conservative,
        PacingTier::Moderate,
        PacingTier::Focused,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PacingTier::Conservative => "Conservative",
            PacingTier::Moderate => "Moderate",
            PacingTier::Focused => "Focused",
        }
    }

    /// Assumed hours of work per day for this tier.
    pub fn hours_per_day(&self) -> u32 {
        match self {
            PacingTier::Conservative => 12,
            PacingTier::Moderate => 10,
            PacingTier::Focused => 8,
        }
    }
}

/// Requests per hour for each pacing tier, rounded to one decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HourlyBudgets {
    pub conservative: f64,
    pub moderate: f64,
    pub focused: f64,
}

impl HourlyBudgets {
    pub fn from_daily_budget(daily_budget: u64) -> Self {
        let pace = |tier: PacingTier| round1(daily_budget as f64 / f64::from(tier.hours_per_day()));
        Self {
            conservative: pace(PacingTier::Conservative),
            moderate: pace(PacingTier::Moderate),
            focused: pace(PacingTier::Focused),
        }
    }

    pub fn get(&self, tier: PacingTier) -> f64 {
        match tier {
            PacingTier::Conservative => self.conservative,
            PacingTier::Moderate => self.moderate,
            PacingTier::Focused => self.focused,
        }
    }
}

/// Midnight UTC at the start of `reset_date`.
pub fn reset_instant(reset_date: NaiveDate) -> DateTime<Utc> {
    reset_date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Fractional days from `now` until midnight UTC on `reset_date`.
///
/// A reset date in the past yields 0.0 rather than negative time.
pub fn days_until_reset(reset_date: NaiveDate, now: DateTime<Utc>) -> f64 {
    let delta = reset_instant(reset_date) - now;
    let seconds = delta.num_milliseconds() as f64 / 1000.0;
    (seconds / SECONDS_PER_DAY).max(0.0)
}

/// Recommended requests per day, using whole days left as the denominator so
/// the final partial day never over-promises.
pub fn daily_budget(remaining: u64, days_until_reset: f64) -> u64 {
    let whole_days = days_until_reset.floor();
    if whole_days < 1.0 {
        return 0;
    }
    remaining / whole_days as u64
}

/// Rounds to one decimal place, ties to even.
///
/// Rounds the stored binary value, so 0.35 (really 0.34999...) becomes 0.3.
pub fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

#[cfg(test)]
#[path = "tests/budget_tests.rs"]
mod tests;
