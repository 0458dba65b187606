mod platform;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use veritas_core::InputMode;

use platform::{AppConfig, LogDestination, RunMode};

#[derive(Parser, Debug)]
#[command(author, version, about = "Check a news claim with the Veritas analysis crew", long_about = None)]
struct Args {
    /// Claim text to analyze (or an article URL with --url). Omit for an interactive session.
    claim: Option<String>,

    /// Treat the input as an article URL
    #[arg(short, long)]
    url: bool,

    /// RON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the analysis service
    #[arg(long)]
    base_url: Option<String>,

    /// Where log output goes
    #[arg(long, value_enum)]
    log: Option<LogDestination>,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    config.apply_env();
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(destination) = args.log {
        config.log_destination = destination;
    }

    platform::logging::initialize(config.log_destination);

    let mode = if args.url {
        InputMode::Url
    } else {
        InputMode::Text
    };
    let run_mode = match args.claim {
        Some(claim) => RunMode::OneShot { claim },
        None => RunMode::Interactive,
    };

    platform::run_app(config, mode, run_mode)
}
