use crate::strategy::RuntimeConfig;
use crate::types::Category;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Reconcile a partner Statement against a Settlement report
#[derive(Parser, Debug)]
#[command(name = "settlement-reconciler")]
#[command(about = "Reconcile a partner Statement against a Settlement report", long_about = None)]
pub struct CliArgs {
    /// Statement workbook or CSV export
    #[arg(value_name = "STATEMENT", help = "Path to the Statement file")]
    pub statement_file: PathBuf,

    /// Settlement workbook or CSV export
    #[arg(value_name = "SETTLEMENT", help = "Path to the Settlement file")]
    pub settlement_file: PathBuf,

    /// Processing strategy to use for normalization
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for sequential or 'async' for parallel normalization"
    )]
    pub strategy: StrategyType,

    /// Number of runtime worker threads (async mode only)
    #[arg(
        long = "worker-threads",
        value_name = "COUNT",
        help = "Number of runtime worker threads (default: 2)"
    )]
    pub worker_threads: Option<usize>,

    /// Categories to write; all when omitted
    #[arg(
        long = "category",
        value_name = "CODE",
        value_parser = clap::value_parser!(u8).range(5..=7),
        help = "Only output this category (5, 6 or 7); may be repeated"
    )]
    pub categories: Vec<u8>,

    /// Where to write the excluded rows
    #[arg(
        long = "excluded",
        value_name = "PATH",
        help = "Write excluded rows as CSV to this file instead of logging them"
    )]
    pub excluded_file: Option<PathBuf>,
}

/// Available processing strategies
#[derive(Clone, Debug, PartialEq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a RuntimeConfig from CLI arguments
    ///
    /// Falls back to the default when `--worker-threads` is omitted or invalid.
    pub fn to_runtime_config(&self) -> RuntimeConfig {
        match self.worker_threads {
            Some(worker_threads) => RuntimeConfig::new(worker_threads),
            None => RuntimeConfig::default(),
        }
    }

    /// Requested category filter, in display order and without repeats
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| self.categories.contains(&category.code()))
            .collect()
    }
}
