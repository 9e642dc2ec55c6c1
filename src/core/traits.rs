//! Core traits for normalization and matching
//!
//! [`Normalizer`] captures what differs between the two feeds (fixed layout rules
//! and how the matching key is located) and provides the shared row loop.
//! [`KeyedRecord`] is the only view of a record that the duplicate tagger and the
//! reconciliation engine need.

use crate::types::{
    ExcludedRow, Feed, NormalizedSettlementRecord, NormalizedStatementRecord, PartnerPin,
    RawRow, ReconcileError, Sheet,
};
use tracing::debug;

/// A normalized record with a matching key
pub trait KeyedRecord {
    /// The partner PIN used for matching
    fn partner_pin(&self) -> &str;

    /// 1-based row in the original sheet
    fn source_row(&self) -> usize;

    /// Whether the PIN repeats within the record's own dataset
    fn is_duplicate(&self) -> bool;

    /// Set the duplicate flag
    fn set_duplicate(&mut self, duplicate: bool);
}

impl KeyedRecord for NormalizedStatementRecord {
    fn partner_pin(&self) -> &str {
        &self.partner_pin
    }

    fn source_row(&self) -> usize {
        self.source_row
    }

    fn is_duplicate(&self) -> bool {
        self.is_duplicate
    }

    fn set_duplicate(&mut self, duplicate: bool) {
        self.is_duplicate = duplicate;
    }
}

impl KeyedRecord for NormalizedSettlementRecord {
    fn partner_pin(&self) -> &str {
        &self.partner_pin
    }

    fn source_row(&self) -> usize {
        self.source_row
    }

    fn is_duplicate(&self) -> bool {
        self.is_duplicate
    }

    fn set_duplicate(&mut self, duplicate: bool) {
        self.is_duplicate = duplicate;
    }
}

/// Valid records of one feed together with the rows rejected along the way
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDataset<R> {
    pub records: Vec<R>,
    pub excluded: Vec<ExcludedRow>,
}

impl<R> Default for NormalizedDataset<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            excluded: Vec::new(),
        }
    }
}

/// Turns one feed's raw sheet into normalized records
pub trait Normalizer {
    /// Record type produced for each valid row
    type Record: KeyedRecord;

    /// Per-sheet layout resolved once before rows are read (header names, key column)
    type Layout;

    /// Feed handled by this normalizer
    fn feed(&self) -> Feed;

    /// Validate the sheet against the feed's fixed layout
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Schema`] when the sheet cannot satisfy the layout.
    fn layout(&self, sheet: &Sheet) -> Result<Self::Layout, ReconcileError>;

    /// Whether the row at a 1-based sheet position carries transaction data
    fn is_data_row(&self, index: usize) -> bool;

    /// Locate and normalize the matching key of a data row
    fn extract_key(&self, layout: &Self::Layout, row: &RawRow) -> Option<PartnerPin>;

    /// Build the record for a data row whose key was found
    fn build_record(
        &self,
        layout: &Self::Layout,
        row: &RawRow,
        partner_pin: PartnerPin,
    ) -> Result<Self::Record, ReconcileError>;

    /// Normalize every data row of the sheet
    ///
    /// Blank rows are skipped. Rows without a key or whose record cannot be built
    /// are collected as [`ExcludedRow`]s; only fatal errors abort.
    fn normalize(&self, sheet: &Sheet) -> Result<NormalizedDataset<Self::Record>, ReconcileError> {
        let layout = self.layout(sheet)?;
        let feed = self.feed();
        let mut dataset = NormalizedDataset::default();

        for row in sheet.rows.iter().filter(|r| self.is_data_row(r.index)) {
            if row.is_blank() {
                continue;
            }

            let outcome = match self.extract_key(&layout, row) {
                Some(pin) => self.build_record(&layout, row, pin),
                None => Err(ReconcileError::missing_key(feed, row.index)),
            };

            match outcome {
                Ok(record) => dataset.records.push(record),
                Err(error) if !error.is_fatal() => {
                    debug!(%feed, row = row.index, %error, "excluding row");
                    dataset.excluded.push(ExcludedRow {
                        feed,
                        source_row: row.index,
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        debug!(
            %feed,
            sheet = %sheet.name,
            records = dataset.records.len(),
            excluded = dataset.excluded.len(),
            "normalized sheet"
        );
        Ok(dataset)
    }
}
