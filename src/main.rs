//! WattMerge - command line entry point.
//!
//! `wattmerge <basename>` reads `<basename>.csv` and `<basename>.tcx` and
//! writes `<basename>-combined.tcx`.

use clap::{ArgAction, Parser, ValueHint};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wattmerge::storage::config::load_config;
use wattmerge::{MergeError, MergePaths, MergeSummary};

#[derive(Parser, Debug)]
#[command(author, version, about = "Merge power log Watts into a TCX track", long_about = None)]
struct Cli {
    /// Export basename without extension (reads <BASENAME>.csv and <BASENAME>.tcx)
    #[arg(value_hint = ValueHint::AnyPath)]
    basename: PathBuf,

    /// Write the combined track here instead of <BASENAME>-combined.tcx
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Drop short power log rows instead of failing
    #[arg(long, action = ArgAction::SetTrue)]
    lenient: bool,

    /// Enable debug logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match execute(&cli) {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("wattmerge: {} failure: {}", e.kind(), e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn execute(cli: &Cli) -> Result<MergeSummary, MergeError> {
    let mut config = load_config(cli.config.as_deref())?;
    if cli.lenient {
        config.power_log.skip_malformed_rows = true;
    }

    let mut paths = MergePaths::from_basename(&cli.basename, &config.output.suffix);
    if let Some(output) = &cli.output {
        paths = paths.with_output(output.clone());
    }

    wattmerge::run(&paths, &config)
}

fn print_summary(summary: &MergeSummary) {
    let report = &summary.report;

    println!("Adding Watts to tcx file complete.");
    println!("Output -> {}", summary.output.display());
    println!(
        "Matched {}/{} trackpoints ({:.1}%) from {} power log entries",
        report.matched,
        report.total,
        report.coverage() * 100.0,
        summary.power_entries
    );
    if summary.rejected_rows > 0 {
        println!("Dropped {} malformed power log rows", summary.rejected_rows);
    }

    println!();
    println!("Skipped points: {}", report.skipped.len());
    for point in &report.skipped {
        println!("  {}", point);
    }
}
