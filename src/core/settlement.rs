//! Settlement feed normalizer
//!
//! The settlement export starts with two preamble rows, then a header row, then
//! transactions. Columns are located by header name because their positions differ
//! between export versions.

use crate::core::header::HeaderRow;
use crate::core::traits::Normalizer;
use crate::types::{
    Feed, NormalizedSettlementRecord, PartnerPin, RawRow, ReconcileError, Sheet,
};
use std::ops::RangeInclusive;

/// Export preamble rows
pub const SETTLEMENT_PREAMBLE_ROWS: RangeInclusive<usize> = 1..=2;

/// Row holding the column headers
pub const SETTLEMENT_HEADER_ROW: usize = 3;

/// Payout amount in the partner's currency
pub const PAYOUT_ROUND_AMT_HEADER: &str = "PayoutRoundAmt";

/// Conversion rate from USD to the payout currency
pub const API_RATE_HEADER: &str = "APIRate";

/// Headers that may carry the matching PIN, in order of preference
///
/// `Pin Number` is the 9-digit PIN printed on the Statement; `PartnerPin` is the
/// fallback for exports that only carry the partner's own identifier.
pub const PIN_HEADERS: [&str; 2] = ["Pin Number", "PartnerPin"];

/// Column positions resolved from the header row
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementLayout {
    pub header: HeaderRow,
    pub pin_column: usize,
    pub payout_column: usize,
    pub rate_column: usize,
}

/// Normalizer for the Settlement feed
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementNormalizer;

impl SettlementNormalizer {
    pub fn new() -> Self {
        SettlementNormalizer
    }
}

fn require_column(header: &HeaderRow, name: &str) -> Result<usize, ReconcileError> {
    header.position(name).ok_or_else(|| {
        ReconcileError::schema(Feed::Settlement, &format!("missing '{}' column", name))
    })
}

impl Normalizer for SettlementNormalizer {
    type Record = NormalizedSettlementRecord;
    type Layout = SettlementLayout;

    fn feed(&self) -> Feed {
        Feed::Settlement
    }

    fn layout(&self, sheet: &Sheet) -> Result<SettlementLayout, ReconcileError> {
        let rows = sheet.row_count();
        if rows < SETTLEMENT_HEADER_ROW {
            return Err(ReconcileError::schema(
                Feed::Settlement,
                &format!(
                    "expected at least {} rows, found {}",
                    SETTLEMENT_HEADER_ROW, rows
                ),
            ));
        }

        let header = HeaderRow::new(sheet.row(SETTLEMENT_HEADER_ROW), sheet.column_count());
        let pin_column = PIN_HEADERS
            .iter()
            .find_map(|name| header.position(name))
            .ok_or_else(|| {
                ReconcileError::schema(
                    Feed::Settlement,
                    &format!("missing partner PIN column (one of {})", PIN_HEADERS.join(", ")),
                )
            })?;
        let payout_column = require_column(&header, PAYOUT_ROUND_AMT_HEADER)?;
        let rate_column = require_column(&header, API_RATE_HEADER)?;

        Ok(SettlementLayout {
            header,
            pin_column,
            payout_column,
            rate_column,
        })
    }

    fn is_data_row(&self, index: usize) -> bool {
        !(SETTLEMENT_PREAMBLE_ROWS.contains(&index) || index == SETTLEMENT_HEADER_ROW)
    }

    fn extract_key(&self, layout: &SettlementLayout, row: &RawRow) -> Option<PartnerPin> {
        row.cell(layout.pin_column).as_key()
    }

    fn build_record(
        &self,
        layout: &SettlementLayout,
        row: &RawRow,
        partner_pin: PartnerPin,
    ) -> Result<NormalizedSettlementRecord, ReconcileError> {
        let payout_cell = row.cell(layout.payout_column);
        let payout = payout_cell.as_decimal().ok_or_else(|| {
            ReconcileError::computation(
                row.index,
                &format!("{} '{}' is not numeric", PAYOUT_ROUND_AMT_HEADER, payout_cell),
            )
        })?;

        let rate_cell = row.cell(layout.rate_column);
        let rate = rate_cell.as_decimal().ok_or_else(|| {
            ReconcileError::computation(
                row.index,
                &format!("{} '{}' is not numeric", API_RATE_HEADER, rate_cell),
            )
        })?;

        NormalizedSettlementRecord::new(
            partner_pin,
            row.index,
            payout,
            rate,
            layout.header.fields(row),
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::CellValue;
    use rust_decimal::Decimal;

    const HEADERS: [&str; 13] = [
        "Date",
        "Pin Number",
        "Sender",
        "PartnerPin",
        "Receiver",
        "Type",
        "G",
        "H",
        "I",
        "J",
        "PayoutRoundAmt",
        "Currency",
        "APIRate",
    ];

    /// Build a Settlement sheet around `data` rows of `(pin, payout, rate)`
    pub(crate) fn settlement_sheet(data: &[(&str, &str, &str)]) -> Sheet {
        let mut rows: Vec<Vec<CellValue>> = vec![
            vec![CellValue::text("Settlement Report")],
            vec![CellValue::text("Generated 2025-01-31")],
            HEADERS.iter().map(|h| CellValue::text(*h)).collect(),
        ];
        for (pin, payout, rate) in data {
            let mut cells = vec![CellValue::Empty; HEADERS.len()];
            cells[0] = CellValue::text("2025-01-15");
            cells[1] = CellValue::text(*pin);
            cells[3] = CellValue::text(format!("PP-{}", pin));
            cells[5] = CellValue::text("Send");
            cells[10] = CellValue::text(*payout);
            cells[11] = CellValue::text("PHP");
            cells[12] = CellValue::text(*rate);
            rows.push(cells);
        }
        Sheet::from_rows("Settlement", rows)
    }

    #[test]
    fn test_computes_amount_usd() {
        let sheet = settlement_sheet(&[("P1", "100", "4")]);
        let dataset = SettlementNormalizer::new().normalize(&sheet).unwrap();

        assert_eq!(dataset.records.len(), 1);
        let record = &dataset.records[0];
        assert_eq!(record.partner_pin, "P1");
        assert_eq!(record.source_row, 4);
        assert_eq!(record.amount_usd(), Decimal::new(25, 0));
        assert_eq!(record.fields["Currency"], CellValue::text("PHP"));
    }

    #[test]
    fn test_payout_with_thousands_separator() {
        let sheet = settlement_sheet(&[("P1", "27,239.00", "56.5")]);
        let dataset = SettlementNormalizer::new().normalize(&sheet).unwrap();
        let record = &dataset.records[0];

        assert_eq!(record.payout_round_amt(), Decimal::new(2723900, 2));
        assert_eq!(
            record.amount_usd(),
            Decimal::new(2723900, 2) / Decimal::new(565, 1)
        );
    }

    #[test]
    fn test_zero_and_non_numeric_rates_are_excluded() {
        let sheet = settlement_sheet(&[
            ("P1", "100", "0"),
            ("P2", "100", "abc"),
            ("P3", "oops", "2"),
            ("P4", "100", "2"),
        ]);
        let dataset = SettlementNormalizer::new().normalize(&sheet).unwrap();

        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.records[0].partner_pin, "P4");

        let rows: Vec<usize> = dataset.excluded.iter().map(|e| e.source_row).collect();
        assert_eq!(rows, vec![4, 5, 6]);
        assert!(dataset
            .excluded
            .iter()
            .all(|e| matches!(e.error, ReconcileError::Computation { .. })));
        assert_eq!(
            dataset.excluded[0].error,
            ReconcileError::computation(4, "APIRate is zero")
        );
    }

    #[test]
    fn test_missing_pin_is_excluded() {
        let sheet = settlement_sheet(&[("", "100", "4")]);
        let dataset = SettlementNormalizer::new().normalize(&sheet).unwrap();

        assert!(dataset.records.is_empty());
        assert_eq!(
            dataset.excluded[0].error,
            ReconcileError::missing_key(Feed::Settlement, 4)
        );
    }

    #[test]
    fn test_falls_back_to_partner_pin_header() {
        let mut sheet = settlement_sheet(&[("P1", "10", "2")]);
        sheet.rows[2].cells[1] = CellValue::text("Reference");
        let dataset = SettlementNormalizer::new().normalize(&sheet).unwrap();

        assert_eq!(dataset.records[0].partner_pin, "PP-P1");
    }

    #[test]
    fn test_missing_rate_header_is_schema_error() {
        let mut sheet = settlement_sheet(&[("P1", "10", "2")]);
        sheet.rows[2].cells[12] = CellValue::text("Rate");
        let result = SettlementNormalizer::new().normalize(&sheet);

        assert_eq!(
            result.unwrap_err(),
            ReconcileError::schema(Feed::Settlement, "missing 'APIRate' column")
        );
    }

    #[test]
    fn test_too_few_rows_is_schema_error() {
        let sheet = Sheet::from_rows("Settlement", vec![vec![CellValue::text("title")]]);
        let result = SettlementNormalizer::new().normalize(&sheet);

        assert!(matches!(
            result,
            Err(ReconcileError::Schema {
                feed: Feed::Settlement,
                ..
            })
        ));
    }
}
