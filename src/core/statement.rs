//! Statement feed normalizer
//!
//! The partner statement export has a fixed layout:
//!
//! ```text
//! rows 1-9   report preamble (dropped)
//! row 10     column headers
//! row 11     annotation row (dropped)
//! row 12..   transactions
//! ```
//!
//! Column D holds a free-text description ending in the 9-digit partner PIN and
//! column L holds the settled amount.

use crate::core::header::HeaderRow;
use crate::core::traits::Normalizer;
use crate::types::{
    CellValue, Feed, NormalizedStatementRecord, PartnerPin, RawRow, ReconcileError, Sheet,
};
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

/// Report preamble rows
pub const STATEMENT_PREAMBLE_ROWS: RangeInclusive<usize> = 1..=9;

/// Row holding the column headers
pub const STATEMENT_HEADER_ROW: usize = 10;

/// Annotation row between the headers and the data
pub const STATEMENT_ANNOTATION_ROW: usize = 11;

/// A sheet must reach the annotation row for the drop rules to apply
pub const STATEMENT_MIN_ROWS: usize = 11;

/// Column D, the description holding the partner PIN
pub const STATEMENT_PIN_COLUMN: usize = 3;

/// Column L, "Settle.Amt"
pub const STATEMENT_SETTLE_AMOUNT_COLUMN: usize = 11;

static TRAILING_PIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{9})\s*$").expect("trailing PIN pattern is valid"));

/// Extract the partner PIN from a Statement description cell
///
/// The PIN is the 9-digit number at the very end of the description. A cell that
/// is a single token with no whitespace is already a bare PIN and is used as is.
pub fn extract_partner_pin(description: &CellValue) -> Option<PartnerPin> {
    let text = description.as_key()?;

    if let Some(captures) = TRAILING_PIN.captures(&text) {
        return Some(captures[1].to_string());
    }

    if text.contains(char::is_whitespace) {
        None
    } else {
        Some(text)
    }
}

/// Normalizer for the Statement feed
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementNormalizer;

impl StatementNormalizer {
    pub fn new() -> Self {
        StatementNormalizer
    }
}

impl Normalizer for StatementNormalizer {
    type Record = NormalizedStatementRecord;
    type Layout = HeaderRow;

    fn feed(&self) -> Feed {
        Feed::Statement
    }

    fn layout(&self, sheet: &Sheet) -> Result<HeaderRow, ReconcileError> {
        let rows = sheet.row_count();
        if rows < STATEMENT_MIN_ROWS {
            return Err(ReconcileError::schema(
                Feed::Statement,
                &format!(
                    "expected at least {} rows, found {}",
                    STATEMENT_MIN_ROWS, rows
                ),
            ));
        }

        let columns = sheet.column_count();
        if columns <= STATEMENT_PIN_COLUMN {
            return Err(ReconcileError::schema(
                Feed::Statement,
                &format!(
                    "expected at least {} columns, found {}",
                    STATEMENT_PIN_COLUMN + 1,
                    columns
                ),
            ));
        }

        Ok(HeaderRow::new(sheet.row(STATEMENT_HEADER_ROW), columns))
    }

    fn is_data_row(&self, index: usize) -> bool {
        !(STATEMENT_PREAMBLE_ROWS.contains(&index)
            || index == STATEMENT_HEADER_ROW
            || index == STATEMENT_ANNOTATION_ROW)
    }

    fn extract_key(&self, _layout: &HeaderRow, row: &RawRow) -> Option<PartnerPin> {
        extract_partner_pin(row.cell(STATEMENT_PIN_COLUMN))
    }

    fn build_record(
        &self,
        layout: &HeaderRow,
        row: &RawRow,
        partner_pin: PartnerPin,
    ) -> Result<NormalizedStatementRecord, ReconcileError> {
        Ok(NormalizedStatementRecord {
            partner_pin,
            source_row: row.index,
            settle_amount: row.cell(STATEMENT_SETTLE_AMOUNT_COLUMN).as_decimal(),
            fields: layout.fields(row),
            is_duplicate: false,
        })
    }
}
