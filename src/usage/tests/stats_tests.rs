use super::*;
use chrono::{NaiveDate, TimeZone};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap()
}

fn snapshot(limit: u64, remaining: u64) -> UsageSnapshot {
    UsageSnapshot {
        login: "username".to_string(),
        plan: "individual_pro".to_string(),
        limit,
        remaining,
        percent_remaining: 70.28,
        unlimited: false,
        reset_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
    }
}

#[test]
fn test_compute_usage_stats_generates_budgets() {
    let stats = compute_usage_stats(&snapshot(1500, 1054), 4, now());

    assert_eq!(stats.daily_budget, 58);
    assert_eq!(stats.usage_pct, 29.7);
    assert_eq!(stats.used, 446);
    assert_eq!(stats.used_today, 4);
    assert!((stats.days_until_reset - 18.5).abs() < 1e-9);
    assert!((stats.hours_until_reset - 444.0).abs() < 1e-6);
    assert_eq!(stats.hourly_budgets.moderate, 5.8);
    assert_eq!(stats.warning, None);
    assert_eq!(stats.status, UsageStatus::Ok);
}

#[test]
fn test_unlimited_short_circuits() {
    let mut unlimited = snapshot(0, 0);
    unlimited.unlimited = true;

    let stats = compute_usage_stats(&unlimited, 12, now());

    assert_eq!(stats.status, UsageStatus::Unlimited);
    assert_eq!(stats.usage_pct, 0.0);
    assert_eq!(stats.daily_budget, 0);
    assert_eq!(stats.hourly_budgets, HourlyBudgets::default());
    assert_eq!(stats.warning, None);
    assert_eq!(stats.used_today, 12);
}

#[test]
fn test_zero_limit_has_no_usage_pct_or_warning() {
    let stats = compute_usage_stats(&snapshot(0, 0), 0, now());
    assert_eq!(stats.usage_pct, 0.0);
    assert_eq!(stats.warning, None);
    assert_eq!(stats.status, UsageStatus::NoBudget);
}

#[test]
fn test_warning_thresholds() {
    let critical = compute_usage_stats(&snapshot(1500, 200), 0, now());
    assert_eq!(critical.warning, Some(QuotaWarning::Critical));
    assert!(critical.warning.unwrap().message().contains("Less than 25%"));

    let notice = compute_usage_stats(&snapshot(1500, 600), 0, now());
    assert_eq!(notice.warning, Some(QuotaWarning::Notice));
    assert!(notice.warning.unwrap().message().contains("Less than 50%"));

    let fine = compute_usage_stats(&snapshot(1500, 750), 0, now());
    assert_eq!(fine.warning, None);
}

#[test]
fn test_warning_boundaries() {
    // Exactly 25% remaining is only a notice; exactly 50% is no warning.
    assert_eq!(QuotaWarning::classify(1000, 250), Some(QuotaWarning::Notice));
    assert_eq!(QuotaWarning::classify(1000, 249), Some(QuotaWarning::Critical));
    assert_eq!(QuotaWarning::classify(1000, 500), None);
    assert_eq!(QuotaWarning::classify(0, 0), None);
}

#[test]
fn test_status_classification() {
    assert_eq!(UsageStatus::classify(10, 0), UsageStatus::NoBudget);
    assert_eq!(UsageStatus::classify(59, 58), UsageStatus::OverBudget);
    assert_eq!(UsageStatus::classify(58, 58), UsageStatus::Approaching);
    assert_eq!(UsageStatus::classify(44, 58), UsageStatus::Approaching);
    assert_eq!(UsageStatus::classify(43, 58), UsageStatus::Ok);
    assert_eq!(UsageStatus::classify(0, 58), UsageStatus::Ok);
}

#[test]
fn test_status_names() {
    assert_eq!(UsageStatus::OverBudget.to_string(), "over_budget");
    assert_eq!(UsageStatus::NoBudget.as_str(), "no_budget");
    assert_eq!(UsageStatus::Unlimited.as_str(), "unlimited");
}

#[test]
fn test_past_reset_date_has_no_budget() {
    let mut stale = snapshot(1500, 1054);
    stale.reset_date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();

    let stats = compute_usage_stats(&stale, 0, now());
    assert_eq!(stats.days_until_reset, 0.0);
    assert_eq!(stats.daily_budget, 0);
    assert_eq!(stats.status, UsageStatus::NoBudget);
}

#[test]
fn test_usage_pct_rounds_stored_value() {
    assert_eq!(compute_usage_stats(&snapshot(2000, 1993), 0, now()).usage_pct, 0.3);
    assert_eq!(compute_usage_stats(&snapshot(2000, 1997), 0, now()).usage_pct, 0.1);
}
