use super::*;
use chrono::TimeZone;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap()
}

fn payload(remaining: u64) -> Value {
    json!({
        "login": "username",
        "copilot_plan": "individual_pro",
        "quota_reset_date": "2026-03-01",
        "quota_snapshots": {
            "premium_interactions": {
                "entitlement": 1500,
                "remaining": remaining,
                "percent_remaining": 70.28,
                "unlimited": false
            }
        }
    })
}

fn source(value: Value) -> impl Fn() -> Result<Value, UsageError> {
    move || Ok(value.clone())
}

fn paths(temp_dir: &TempDir) -> UsagePaths {
    UsagePaths {
        cache_path: temp_dir.path().join("cache.txt"),
        history_path: temp_dir.path().join("history.csv"),
    }
}

#[test]
fn test_run_check_outputs_key_lines() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_check(&source(payload(1054)), &paths(&temp_dir), now(), false).unwrap();

    assert!(output.contains("Total Limit:      1500 requests"));
    assert!(output.contains("Recommended daily budget: 58 requests/day"));
    assert!(output.contains("Usage:            29.7%"));
}

#[test]
fn test_run_check_warns_when_low_quota() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_check(&source(payload(200)), &paths(&temp_dir), now(), false).unwrap();

    assert!(output.contains("WARNING: Less than 25% of requests remaining"));
}

#[test]
fn test_run_check_tracks_used_today() {
    let temp_dir = TempDir::new().unwrap();
    let paths = paths(&temp_dir);

    let first = run_check(&source(payload(1054)), &paths, now(), false).unwrap();
    let later = now() + chrono::Duration::hours(2);
    let second = run_check(&source(payload(1044)), &paths, later, false).unwrap();

    assert!(first.contains("Used today (UTC): 0 requests"));
    assert!(second.contains("Used today (UTC): 10 requests"));
    assert_eq!(
        fs::read_to_string(&paths.cache_path).unwrap(),
        "2026-02-10\n1044\n"
    );
}

#[test]
fn test_run_check_unlimited_skips_cache() {
    let temp_dir = TempDir::new().unwrap();
    let paths = paths(&temp_dir);
    let mut unlimited = payload(0);
    unlimited["quota_snapshots"]["premium_interactions"]["unlimited"] = json!(true);

    let output = run_check(&source(unlimited), &paths, now(), false).unwrap();

    assert!(output.contains("UNLIMITED"));
    assert!(!paths.cache_path.exists());
}

#[test]
fn test_run_check_propagates_fetch_error() {
    let temp_dir = TempDir::new().unwrap();
    let failing = || -> Result<Value, UsageError> { Err(UsageError::GhNotFound) };

    let err = run_check(&failing, &paths(&temp_dir), now(), false).unwrap_err();
    assert!(matches!(err, UsageError::GhNotFound));
    assert_eq!(
        err.to_string(),
        "gh CLI not found. Install GitHub CLI and login first."
    );
}

#[test]
fn test_run_check_invalid_payload() {
    let temp_dir = TempDir::new().unwrap();
    let err = run_check(
        &source(json!({"login": "username"})),
        &paths(&temp_dir),
        now(),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, UsageError::InvalidPayload(_)));
}

#[test]
fn test_run_track_appends_history_and_detects_change() {
    let temp_dir = TempDir::new().unwrap();
    let paths = paths(&temp_dir);

    let first = run_track(&source(payload(1054)), &paths, now(), false).unwrap();
    let later = now() + chrono::Duration::hours(1);
    let second = run_track(&source(payload(1044)), &paths, later, false).unwrap();

    assert!(first.contains("Usage recorded"));
    assert!(second.contains("Usage recorded"));
    assert!(second.contains("Used 10 requests since last check"));
    assert!(second.contains("Rate: 10.0 requests/hour"));

    let content = fs::read_to_string(&paths.history_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "timestamp,limit,used,remaining,percent_used,days_until_reset,plan",
            "2026-02-10T12:00:00+00:00,1500,446,1054,29.7,18.5,individual_pro",
            "2026-02-10T13:00:00+00:00,1500,456,1044,30.4,18.5,individual_pro",
        ]
    );
}

#[test]
fn test_run_track_handles_naive_history_timestamp() {
    let temp_dir = TempDir::new().unwrap();
    let paths = paths(&temp_dir);
    fs::write(
        &paths.history_path,
        "timestamp,limit,used,remaining,percent_used,days_until_reset,plan\n\
         2026-02-10T12:00:00,1500,446,1054,29.7,18.5,individual_pro\n",
    )
    .unwrap();

    let later = Utc.with_ymd_and_hms(2026, 2, 10, 13, 0, 0).unwrap();
    let output = run_track(&source(payload(1044)), &paths, later, false).unwrap();

    assert!(output.contains("Used 10 requests since last check"));
}

#[test]
fn test_run_track_detects_quota_reset() {
    let temp_dir = TempDir::new().unwrap();
    let paths = paths(&temp_dir);

    run_track(&source(payload(200)), &paths, now(), false).unwrap();
    let later = now() + chrono::Duration::hours(3);
    let output = run_track(&source(payload(1500)), &paths, later, false).unwrap();

    assert!(output.contains("Monthly reset detected"));
    assert!(!output.contains("since last check"));
}
