//! Locations of the on-disk state used by `check` and `track`.
//!
//! - same-day cache: `<temp dir>/gh-copilot-usage-tracker.txt`
//! - history log: `$HISTORY_FILE`, else `~/.copilot-usage-history.csv`
//!
//! Both can be overridden from the command line. The core modules only ever
//! see the resolved [`UsagePaths`].

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable that overrides the history file location.
pub const HISTORY_FILE_ENV: &str = "HISTORY_FILE";

const CACHE_FILE_NAME: &str = "gh-copilot-usage-tracker.txt";
const HISTORY_FILE_NAME: &str = ".copilot-usage-history.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsagePaths {
    pub cache_path: PathBuf,
    pub history_path: PathBuf,
}

impl UsagePaths {
    /// Resolves paths, preferring explicit overrides over environment and defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the history path falls back to the home directory
    /// and the home directory cannot be determined.
    pub fn resolve(cache_override: Option<PathBuf>, history_override: Option<PathBuf>) -> Result<Self> {
        let cache_path = cache_override.unwrap_or_else(default_cache_path);
        let history_path = match history_override {
            Some(path) => path,
            None => default_history_path()?,
        };
        Ok(Self {
            cache_path,
            history_path,
        })
    }
}

/// Returns the same-day cache path: `<temp dir>/gh-copilot-usage-tracker.txt`
pub fn default_cache_path() -> PathBuf {
    std::env::temp_dir().join(CACHE_FILE_NAME)
}

/// Returns the history path from `HISTORY_FILE`, or `~/.copilot-usage-history.csv`.
pub fn default_history_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(HISTORY_FILE_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let home = dirs::home_dir().context("Could not determine home directory for usage history")?;
    Ok(home.join(HISTORY_FILE_NAME))
}

#[cfg(test)]
#[path = "tests/usage_paths_tests.rs"]
mod tests;
