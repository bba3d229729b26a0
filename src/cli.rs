use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "copilot-usage")]
#[command(about = "Check and track GitHub Copilot premium request usage")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log debug output to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Same-day usage cache file (default: <temp dir>/gh-copilot-usage-tracker.txt)
    #[arg(long, global = true)]
    pub cache_file: Option<PathBuf>,

    /// History CSV file (default: $HISTORY_FILE or ~/.copilot-usage-history.csv)
    #[arg(long, global = true)]
    pub history_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Check current Copilot usage
    Check,
    /// Track Copilot usage history
    Track,
}

impl Cli {
    pub fn color(&self) -> bool {
        !self.no_color
    }
}
