mod cli;
mod commands;
mod error;
mod gh_usage;
mod report;
mod usage;
mod usage_paths;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Command};
use gh_usage::GhCli;
use usage_paths::UsagePaths;

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let paths = UsagePaths::resolve(cli.cache_file.clone(), cli.history_file.clone())?;
    let now = chrono::Utc::now();

    let output = match cli.command {
        Command::Check => commands::run_check(&GhCli, &paths, now, cli.color())?,
        Command::Track => commands::run_track(&GhCli, &paths, now, cli.color())?,
    };
    Ok(output)
}

fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("copilot_usage=debug")
    } else {
        EnvFilter::new("copilot_usage=warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
