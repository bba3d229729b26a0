//! Fetches the Copilot usage payload through the GitHub CLI.
//!
//! Authentication is delegated entirely to `gh`; this module only runs
//! `gh api /copilot_internal/user` and decodes the JSON it prints.

use std::process::Command;

use serde_json::Value;

use crate::error::UsageError;

const COPILOT_USER_ENDPOINT: &str = "/copilot_internal/user";

/// Source of raw usage payloads.
pub trait UsageSource {
    fn fetch(&self) -> Result<Value, UsageError>;
}

impl<F> UsageSource for F
where
    F: Fn() -> Result<Value, UsageError>,
{
    fn fetch(&self) -> Result<Value, UsageError> {
        self()
    }
}

/// Fetches usage by shelling out to an authenticated `gh`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GhCli;

impl UsageSource for GhCli {
    fn fetch(&self) -> Result<Value, UsageError> {
        let gh = which::which("gh").map_err(|_| UsageError::GhNotFound)?;
        tracing::debug!("Running {} api {}", gh.display(), COPILOT_USER_ENDPOINT);

        let output = Command::new(&gh)
            .args(["api", COPILOT_USER_ENDPOINT])
            .output()
            .map_err(|e| UsageError::ApiCall(format!("Failed to run gh: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(UsageError::ApiCall(api_error_message(&stderr)));
        }

        decode_response(&output.stdout)
    }
}

fn api_error_message(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        "Unable to access Copilot usage API.".to_string()
    } else {
        trimmed.to_string()
    }
}

fn decode_response(stdout: &[u8]) -> Result<Value, UsageError> {
    serde_json::from_slice(stdout).map_err(UsageError::MalformedResponse)
}
