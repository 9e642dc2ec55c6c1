//! Result assembly
//!
//! Merges the engine's category streams into the single ordered collection the
//! display layer consumes: category 5, then 6, then 7, each in source row order.

use crate::core::engine::CategoryStreams;
use crate::types::{ClassifiedRecord, ExcludedRow, ReconciliationResult};
use tracing::info;

/// Builds the final [`ReconciliationResult`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAssembler;

impl ResultAssembler {
    pub fn new() -> Self {
        ResultAssembler
    }

    /// Order and merge the category streams, attaching the excluded rows
    pub fn assemble(
        &self,
        streams: CategoryStreams,
        mut excluded: Vec<ExcludedRow>,
    ) -> ReconciliationResult {
        let CategoryStreams {
            mut present_in_both,
            mut settlement_only,
            mut statement_only,
        } = streams;

        present_in_both.sort_by_key(|r| (r.statement_row(), r.settlement_row()));
        settlement_only.sort_by_key(ClassifiedRecord::settlement_row);
        statement_only.sort_by_key(ClassifiedRecord::statement_row);
        excluded.sort_by_key(|e| (e.feed, e.source_row));

        info!(
            present_in_both = present_in_both.len(),
            settlement_only = settlement_only.len(),
            statement_only = statement_only.len(),
            excluded = excluded.len(),
            "reconciliation assembled"
        );

        let mut records =
            Vec::with_capacity(present_in_both.len() + settlement_only.len() + statement_only.len());
        records.extend(present_in_both);
        records.extend(settlement_only);
        records.extend(statement_only);

        ReconciliationResult { records, excluded }
    }
}
