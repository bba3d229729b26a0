//! Error taxonomy for fetching and interpreting Copilot usage.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsageError {
    /// The `gh` executable is not on PATH.
    #[error("gh CLI not found. Install GitHub CLI and login first.")]
    GhNotFound,

    /// `gh` could not be spawned or exited non-zero.
    #[error("{0}")]
    ApiCall(String),

    /// `gh` succeeded but stdout was not JSON.
    #[error("Failed to parse API response.")]
    MalformedResponse(#[source] serde_json::Error),

    /// The payload parsed as JSON but lacks the quota section or has a bad field.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Failed to write {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UsageError {
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}
