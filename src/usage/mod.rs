//! Premium request quota math.
//!
//! - `snapshot` - normalize the API payload
//! - `budget` - days until reset, daily and hourly budgets
//! - `daily_cache` - same-day usage delta across `check` runs
//! - `stats` - combine the above into warnings and a status
//! - `history` - append-only CSV log written by `track`

pub mod budget;
pub mod daily_cache;
pub mod history;
pub mod snapshot;
pub mod stats;

pub use daily_cache::DailyCache;
pub use history::{AppendOutcome, HistoryLog};
pub use snapshot::{parse_usage_payload, UsageSnapshot};
pub use stats::{compute_usage_stats, QuotaWarning, UsageComputation, UsageStatus};
