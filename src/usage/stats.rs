//! Combines a snapshot and today's usage into budgets, a warning and a status.

use super::budget::{self, HourlyBudgets};
use super::snapshot::UsageSnapshot;
use chrono::{DateTime, Utc};
use std::fmt;

/// Fraction of daily budget at which usage counts as approaching the limit.
const APPROACHING_RATIO: f64 = 0.75;

/// Low-quota warning, from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaWarning {
    /// Less than 25% of the limit remains
    Critical,
    /// Less than 50% of the limit remains
    Notice,
}

impl QuotaWarning {
    pub fn message(&self) -> &'static str {
        match self {
            QuotaWarning::Critical => "WARNING: Less than 25% of requests remaining",
            QuotaWarning::Notice => "NOTICE: Less than 50% of requests remaining",
        }
    }

    /// Checks the stricter threshold first; the first match wins.
    pub fn classify(limit: u64, remaining: u64) -> Option<Self> {
        if limit == 0 {
            return None;
        }
        let remaining = remaining as f64;
        let limit = limit as f64;
        if remaining < limit * 0.25 {
            Some(QuotaWarning::Critical)
        } else if remaining < limit * 0.50 {
            Some(QuotaWarning::Notice)
        } else {
            None
        }
    }
}

impl fmt::Display for QuotaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// How today's consumption compares with the daily budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageStatus {
    Ok,
    NoBudget,
    OverBudget,
    Approaching,
    Unlimited,
}

impl UsageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageStatus::Ok => "ok",
            UsageStatus::NoBudget => "no_budget",
            UsageStatus::OverBudget => "over_budget",
            UsageStatus::Approaching => "approaching",
            UsageStatus::Unlimited => "unlimited",
        }
    }

    /// First match wins: no budget, over budget, approaching, ok.
    pub fn classify(used_today: u64, daily_budget: u64) -> Self {
        if daily_budget == 0 {
            UsageStatus::NoBudget
        } else if used_today > daily_budget {
            UsageStatus::OverBudget
        } else if used_today as f64 >= daily_budget as f64 * APPROACHING_RATIO {
            UsageStatus::Approaching
        } else {
            UsageStatus::Ok
        }
    }
}

impl fmt::Display for UsageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived statistics for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageComputation {
    /// Percent of the limit used, one decimal
    pub usage_pct: f64,
    pub used: u64,
    pub used_today: u64,
    pub days_until_reset: f64,
    pub hours_until_reset: f64,
    pub daily_budget: u64,
    pub hourly_budgets: HourlyBudgets,
    pub warning: Option<QuotaWarning>,
    pub status: UsageStatus,
}

pub fn compute_usage_stats(
    snapshot: &UsageSnapshot,
    used_today: u64,
    now: DateTime<Utc>,
) -> UsageComputation {
    let days_until_reset = budget::days_until_reset(snapshot.reset_date, now);
    let hours_until_reset = days_until_reset * 24.0;

    if snapshot.unlimited {
        return UsageComputation {
            usage_pct: 0.0,
            used: snapshot.used(),
            used_today,
            days_until_reset,
            hours_until_reset,
            daily_budget: 0,
            hourly_budgets: HourlyBudgets::default(),
            warning: None,
            status: UsageStatus::Unlimited,
        };
    }

    let usage_pct = if snapshot.limit > 0 {
        budget::round1(snapshot.used() as f64 * 100.0 / snapshot.limit as f64)
    } else {
        0.0
    };

    let daily_budget = budget::daily_budget(snapshot.remaining, days_until_reset);

    UsageComputation {
        usage_pct,
        used: snapshot.used(),
        used_today,
        days_until_reset,
        hours_until_reset,
        daily_budget,
        hourly_budgets: HourlyBudgets::from_daily_budget(daily_budget),
        warning: QuotaWarning::classify(snapshot.limit, snapshot.remaining),
        status: UsageStatus::classify(used_today, daily_budget),
    }
}

#[cfg(test)]
#[path = "tests/stats_tests.rs"]
mod tests;
