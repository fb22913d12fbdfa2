//! verify-session CLI for the provably-fair session verifier.
//!
//! Loads a revealed session record, checks the seed commitments, replays the
//! session deterministically and reports the verdict.
//!
//! ## Usage
//!
//! ```bash
//! # Text report
//! verify_session --input session_record.json
//!
//! # Machine-readable result
//! verify_session --input session_record.json --format json
//! ```
//!
//! ## Exit Codes
//! - 0: session verified
//! - 1: session invalid, or the record failed to load

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use satya_verifier::{load_session_record, render_text_report, verify_session};
use tracing_subscriber::EnvFilter;

/// verify-session: independent verifier for revealed trading-game sessions.
#[derive(Parser)]
#[command(name = "verify_session")]
#[command(version)]
#[command(about = "Verify seed commitments and deterministically replay a session record")]
struct Cli {
    /// Path to the revealed session record (JSON)
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Output format: text (default) or json
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Log internal progress to stderr (RUST_LOG overrides)
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(valid) => {
            if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let record = load_session_record(&cli.input)
        .with_context(|| format!("load session record {}", cli.input.display()))?;

    let result = verify_session(&record);

    match cli.format {
        OutputFormat::Text => print!("{}", render_text_report(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(result.valid)
}
