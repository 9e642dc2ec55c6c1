//! Settlement Reconciler CLI
//!
//! Command-line interface for reconciling a Statement export against a Settlement report.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- statement.xlsx settlement.xlsx > reconciled.csv
//! cargo run -- --strategy async --worker-threads 4 statement.xlsx settlement.xlsx > reconciled.csv
//! cargo run -- --category 6 --category 7 statement.xlsx settlement.xlsx > unmatched.csv
//! cargo run -- --excluded excluded.csv statement.xlsx settlement.xlsx > reconciled.csv
//! ```
//!
//! The classified rows are written to stdout as CSV. Logs go to stderr and are
//! controlled with `RUST_LOG` (default `info`). Excluded rows are written to the
//! `--excluded` file when given, and logged as warnings otherwise.
//!
//! # Exit Codes
//!
//! - 0: Success (including runs with excluded rows)
//! - 1: Error (missing file, unsupported format, schema violation, etc.)

use settlement_reconciler::cli::{self, CliArgs};
use settlement_reconciler::io::{write_classified_csv, write_excluded_csv};
use settlement_reconciler::strategy;
use settlement_reconciler::types::ReconcileError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(args: &CliArgs) -> Result<(), ReconcileError> {
    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_runtime_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), config)
    };

    let result = strategy.process(&args.statement_file, &args.settlement_file)?;

    let stdout = io::stdout();
    let mut output = stdout.lock();
    write_classified_csv(&result, &args.categories(), &mut output)?;
    output.flush()?;

    match &args.excluded_file {
        Some(path) => {
            let mut file = BufWriter::new(File::create(path)?);
            write_excluded_csv(&result.excluded, &mut file)?;
            file.flush()?;
        }
        None => {
            for row in &result.excluded {
                warn!(feed = %row.feed, row = row.source_row, "excluded: {}", row.error);
            }
        }
    }

    Ok(())
}

fn main() {
    init_logging();

    // Parse command-line arguments using clap
    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
