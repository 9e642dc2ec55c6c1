//! Parallel processing strategy
//!
//! This module provides a multi-threaded implementation of the ProcessingStrategy
//! trait. The two feeds are independent until classification, so each normalizer
//! runs as its own blocking task on a tokio runtime. Tagging, classification and
//! assembly then run once both datasets are available.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── RuntimeConfig (worker_threads)
//!     ├── spawn_blocking(StatementNormalizer) ─┐
//!     ├── spawn_blocking(SettlementNormalizer) ┴─> join
//!     └── ReconciliationPipeline (tag → classify → assemble)
//! ```
//!
//! Errors are reported in the same order as the sequential strategy: a Statement
//! failure wins over a Settlement failure, so both strategies produce identical
//! results for identical input.

use crate::core::{Normalizer, ReconciliationPipeline, SettlementNormalizer, StatementNormalizer};
use crate::strategy::ProcessingStrategy;
use crate::types::{ReconcileError, ReconciliationResult, Sheet};
use tokio::task::JoinError;
use tracing::{debug, warn};

/// Configuration for the tokio runtime
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    /// Number of runtime worker threads
    pub worker_threads: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        // One per feed
        Self { worker_threads: 2 }
    }
}

impl RuntimeConfig {
    /// Create a new RuntimeConfig, falling back to the default for invalid values
    pub fn new(worker_threads: usize) -> Self {
        let default = Self::default();

        let worker_threads = if worker_threads == 0 {
            warn!(
                worker_threads,
                default = default.worker_threads,
                "invalid worker thread count, using default"
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self { worker_threads }
    }
}

fn task_failed(error: JoinError) -> ReconcileError {
    ReconcileError::TaskFailed {
        message: error.to_string(),
    }
}

/// Parallel processing strategy
///
/// Normalizes both feeds concurrently on a multi-threaded tokio runtime.
///
/// # Thread Safety
///
/// AsyncProcessingStrategy is Send + Sync. Each call to `reconcile` builds its own
/// runtime and moves the sheets into the blocking tasks, so no state is shared
/// between runs.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: RuntimeConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Normalize both sheets in parallel, then classify and assemble
    ///
    /// # Errors
    ///
    /// * [`ReconcileError::TaskFailed`] if the runtime cannot be created or a task panics
    /// * Any fatal normalizer error, Statement first
    fn reconcile(
        &self,
        statement: Sheet,
        settlement: Sheet,
    ) -> Result<ReconciliationResult, ReconcileError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .build()
            .map_err(|e| ReconcileError::TaskFailed {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        debug!(
            worker_threads = self.config.worker_threads,
            "normalizing feeds in parallel"
        );

        let (statement, settlement) = runtime.block_on(async move {
            let statement_task = tokio::task::spawn_blocking(move || {
                StatementNormalizer::new().normalize(&statement)
            });
            let settlement_task = tokio::task::spawn_blocking(move || {
                SettlementNormalizer::new().normalize(&settlement)
            });

            (statement_task.await, settlement_task.await)
        });

        let statement = statement.map_err(task_failed)??;
        let settlement = settlement.map_err(task_failed)??;

        Ok(ReconciliationPipeline::new().complete(statement, settlement))
    }
}
