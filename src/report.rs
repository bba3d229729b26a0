//! Human-readable output for the `check` and `track` commands.

use chrono::{DateTime, Utc};

use crate::usage::budget::{self, PacingTier};
use crate::usage::history::{format_timestamp, PreviousRecord};
use crate::usage::{AppendOutcome, QuotaWarning, UsageComputation, UsageSnapshot, UsageStatus};

/// Rate is only reported when the previous reading is this recent.
const MAX_RATE_WINDOW_HOURS: f64 = 48.0;

/// ANSI foreground colours used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
}

impl Color {
    fn code(&self) -> &'static str {
        match self {
            Color::Red => "31",
            Color::Green => "32",
            Color::Yellow => "33",
            Color::Blue => "34",
            Color::Cyan => "36",
        }
    }
}

/// Wraps `text` in an ANSI colour sequence. Returns it unchanged when disabled.
pub fn paint(text: &str, color: Color, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }
    format!("\x1b[{}m{}\x1b[0m", color.code(), text)
}

pub fn format_check_report(
    snapshot: &UsageSnapshot,
    stats: &UsageComputation,
    color: bool,
) -> String {
    let mut lines = vec![
        paint(
            "=== GitHub Copilot Premium Request Usage ===",
            Color::Blue,
            color,
        ),
        String::new(),
        format!("User: {}", paint(&snapshot.login, Color::Green, color)),
        format!("Plan: {}", paint(&snapshot.plan, Color::Cyan, color)),
        String::new(),
    ];

    if snapshot.unlimited {
        lines.push(paint(
            "✓ You have UNLIMITED premium requests!",
            Color::Green,
            color,
        ));
        lines.push("No quota tracking needed.".to_string());
        return lines.join("\n");
    }

    lines.push(paint("Copilot Premium Model Requests:", Color::Green, color));
    lines.push(format!("  Total Limit:      {} requests", snapshot.limit));
    lines.push(format!("  Remaining:        {} requests", snapshot.remaining));
    lines.push(format!("  Used:             {} requests", snapshot.used()));
    lines.push(format!("  Used today (UTC): {} requests", stats.used_today));
    lines.push(format!("  Usage:            {:.1}%", stats.usage_pct));

    if stats.days_until_reset > 0.0 {
        let resets_at = budget::reset_instant(snapshot.reset_date);
        lines.push(format!(
            "  Resets at:        {}",
            resets_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        if stats.days_until_reset > 1.0 {
            lines.push(format!(
                "  Time until reset: {:.1} days",
                stats.days_until_reset
            ));
        } else {
            lines.push(format!(
                "  Time until reset: {:.1} hours",
                stats.hours_until_reset
            ));
        }
    }

    lines.push(String::new());
    lines.push(paint(
        "=== Daily Usage Recommendations ===",
        Color::Yellow,
        color,
    ));

    if stats.daily_budget == 0 {
        lines.push(paint("No usage data available.", Color::Red, color));
        return lines.join("\n");
    }

    lines.push(format!(
        "  Recommended daily budget: {} requests/day",
        stats.daily_budget
    ));
    lines.push("  Usage patterns:".to_string());
    for tier in PacingTier::ALL {
        let label = format!("{} ({}h/day):", tier.label(), tier.hours_per_day());
        lines.push(format!(
            "    {:<23} ~{:.1} requests/hour",
            label,
            stats.hourly_budgets.get(tier)
        ));
    }

    lines.push(String::new());
    lines.push(status_line(stats, color));

    if let Some(warning) = stats.warning {
        lines.push(String::new());
        lines.push(paint(warning.message(), Color::Red, color));
        if warning == QuotaWarning::Critical {
            lines.push(paint(
                "Consider conserving requests until reset.",
                Color::Yellow,
                color,
            ));
        }
    }

    lines.join("\n")
}

fn status_line(stats: &UsageComputation, color: bool) -> String {
    let used_today = stats.used_today;
    let budget = stats.daily_budget;
    match stats.status {
        UsageStatus::OverBudget => paint(
            &format!(
                "Status: ⚠ Over budget by {} requests",
                used_today.saturating_sub(budget)
            ),
            Color::Red,
            color,
        ),
        UsageStatus::Approaching => paint(
            &format!(
                "Status: ⚠ Used {}/{} (approaching limit)",
                used_today, budget
            ),
            Color::Yellow,
            color,
        ),
        _ => paint(
            &format!("Status: ✓ Used {}/{}", used_today, budget),
            Color::Green,
            color,
        ),
    }
}

pub fn format_track_report(
    snapshot: &UsageSnapshot,
    stats: &UsageComputation,
    outcome: &AppendOutcome,
    now: DateTime<Utc>,
    color: bool,
) -> String {
    let mut lines = vec![
        paint("Usage recorded!", Color::Green, color),
        String::new(),
        "Current status:".to_string(),
        format!("  Limit:     {}", snapshot.limit),
        format!("  Used:      {} ({:.1}%)", stats.used, stats.usage_pct),
        format!("  Remaining: {}", snapshot.remaining),
        format!("  Resets in: {:.1} days", stats.days_until_reset),
        String::new(),
        "History file:".to_string(),
        format!("  {}", outcome.record),
    ];

    if let Some(previous) = &outcome.previous {
        lines.extend(delta_lines(snapshot.used(), previous, now, color));
    }

    lines.join("\n")
}

fn delta_lines(used: u64, previous: &PreviousRecord, now: DateTime<Utc>, color: bool) -> Vec<String> {
    if used > previous.used {
        let change = used - previous.used;
        let mut lines = vec![paint(
            &format!(
                "Used {} requests since last check ({})",
                change,
                format_timestamp(previous.timestamp)
            ),
            Color::Green,
            color,
        )];
        let elapsed_hours = (now - previous.timestamp).num_milliseconds() as f64 / 3_600_000.0;
        if elapsed_hours > 0.0 && elapsed_hours < MAX_RATE_WINDOW_HOURS {
            let rate = budget::round1(change as f64 / elapsed_hours);
            lines.push(format!("   Rate: {:.1} requests/hour", rate));
        }
        lines
    } else if used < previous.used {
        vec![paint(
            "Monthly reset detected (quota refreshed)",
            Color::Yellow,
            color,
        )]
    } else {
        vec!["No change since last check".to_string()]
    }
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;
