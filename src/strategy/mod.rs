//! Processing strategy module for reconciliation runs
//!
//! This module defines the Strategy pattern for complete reconciliation pipelines,
//! from two raw sheets to the assembled result. This allows the normalizers to run
//! sequentially or in parallel, selected at runtime. Both strategies produce the same
//! result for the same input.

use crate::cli::StrategyType;
use crate::io::read_sheet;
use crate::types::{ReconcileError, ReconciliationResult, Sheet};
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, RuntimeConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete reconciliation runs
pub trait ProcessingStrategy: Send + Sync {
    /// Reconcile a Statement sheet against a Settlement sheet
    ///
    /// # Returns
    ///
    /// * `Ok(ReconciliationResult)` with the classified rows and any excluded rows
    /// * `Err(ReconcileError)` if a fatal error occurred (schema violation, task failure)
    ///
    /// Row-level problems never fail the run; they are reported in
    /// [`ReconciliationResult::excluded`].
    fn reconcile(
        &self,
        statement: Sheet,
        settlement: Sheet,
    ) -> Result<ReconciliationResult, ReconcileError>;

    /// Read both files and reconcile them
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or decoded, or if
    /// [`ProcessingStrategy::reconcile`] fails.
    fn process(
        &self,
        statement_path: &Path,
        settlement_path: &Path,
    ) -> Result<ReconciliationResult, ReconcileError> {
        let statement = read_sheet(statement_path)?;
        let settlement = read_sheet(settlement_path)?;
        self.reconcile(statement, settlement)
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional runtime configuration for the async strategy (ignored for sync)
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<RuntimeConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
