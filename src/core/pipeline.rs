//! Post-normalization pipeline
//!
//! ```text
//! statement dataset ──┐
//!                     ├─ DuplicateTagger (each) → ReconciliationEngine → ResultAssembler
//! settlement dataset ─┘
//! ```
//!
//! Both processing strategies normalize the sheets their own way and hand the two
//! datasets to [`ReconciliationPipeline::complete`].

use crate::core::assembler::ResultAssembler;
use crate::core::duplicates::DuplicateTagger;
use crate::core::engine::ReconciliationEngine;
use crate::core::traits::NormalizedDataset;
use crate::types::{NormalizedSettlementRecord, NormalizedStatementRecord, ReconciliationResult};

/// Tagging, classification and assembly for one run
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationPipeline {
    tagger: DuplicateTagger,
    engine: ReconciliationEngine,
    assembler: ResultAssembler,
}

impl ReconciliationPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the remaining stages on two normalized datasets
    pub fn complete(
        &self,
        statement: NormalizedDataset<NormalizedStatementRecord>,
        settlement: NormalizedDataset<NormalizedSettlementRecord>,
    ) -> ReconciliationResult {
        let NormalizedDataset {
            records: mut statements,
            excluded: mut excluded,
        } = statement;
        let NormalizedDataset {
            records: mut settlements,
            excluded: settlement_excluded,
        } = settlement;
        excluded.extend(settlement_excluded);

        self.tagger.tag(&mut statements);
        self.tagger.tag(&mut settlements);

        let streams = self.engine.reconcile(statements, settlements);
        self.assembler.assemble(streams, excluded)
    }
}
