//! Synchronous processing strategy
//!
//! Normalizes the Statement sheet, then the Settlement sheet, on the calling thread
//! and hands both datasets to the [`ReconciliationPipeline`].

use crate::core::{Normalizer, ReconciliationPipeline, SettlementNormalizer, StatementNormalizer};
use crate::strategy::ProcessingStrategy;
use crate::types::{ReconcileError, ReconciliationResult, Sheet};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use settlement_reconciler::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let strategy = SyncProcessingStrategy;
/// let result = strategy
///     .process(Path::new("statement.xlsx"), Path::new("settlement.xlsx"))
///     .expect("Reconciliation failed");
/// println!("{} classified rows", result.records.len());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn reconcile(
        &self,
        statement: Sheet,
        settlement: Sheet,
    ) -> Result<ReconciliationResult, ReconcileError> {
        let statement = StatementNormalizer::new().normalize(&statement)?;
        let settlement = SettlementNormalizer::new().normalize(&settlement)?;

        Ok(ReconciliationPipeline::new().complete(statement, settlement))
    }
}
