//! CSV output for the reconciled view and the excluded rows
//!
//! This module centralizes the output format:
//! - one row per [`ClassifiedRecord`], labeled with its category
//! - one row per [`ExcludedRow`] with the reason it was rejected
//!
//! Decimal values are written with 4 decimal places; absent values are empty.

use crate::types::{Category, ClassifiedRecord, ExcludedRow, ReconcileError, ReconciliationResult};
use csv::WriterBuilder;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// Header of the classified output
pub const CLASSIFIED_HEADER: [&str; 12] = [
    "category",
    "label",
    "partner_pin",
    "statement_row",
    "settlement_row",
    "statement_duplicate",
    "settlement_duplicate",
    "settle_amount",
    "payout_round_amt",
    "api_rate",
    "amount_usd",
    "variance",
];

/// Header of the excluded-rows output
pub const EXCLUDED_HEADER: [&str; 3] = ["feed", "row", "error"];

/// CSV row for a classified record
#[derive(Debug, Serialize, PartialEq)]
pub struct ClassifiedCsvRow<'a> {
    pub category: u8,
    pub label: &'static str,
    pub partner_pin: &'a str,
    pub statement_row: Option<usize>,
    pub settlement_row: Option<usize>,
    pub statement_duplicate: Option<bool>,
    pub settlement_duplicate: Option<bool>,
    pub settle_amount: Option<String>,
    pub payout_round_amt: Option<String>,
    pub api_rate: Option<String>,
    pub amount_usd: Option<String>,
    pub variance: Option<String>,
}

fn amount(value: Decimal) -> String {
    format!("{:.4}", value)
}

impl<'a> From<&'a ClassifiedRecord> for ClassifiedCsvRow<'a> {
    fn from(record: &'a ClassifiedRecord) -> Self {
        let statement = record.statement.as_deref();
        let settlement = record.settlement.as_deref();

        ClassifiedCsvRow {
            category: record.category.code(),
            label: record.category.label(),
            partner_pin: &record.partner_pin,
            statement_row: statement.map(|s| s.source_row),
            settlement_row: settlement.map(|s| s.source_row),
            statement_duplicate: statement.map(|s| s.is_duplicate),
            settlement_duplicate: settlement.map(|s| s.is_duplicate),
            settle_amount: statement.and_then(|s| s.settle_amount).map(amount),
            payout_round_amt: settlement.map(|s| amount(s.payout_round_amt())),
            api_rate: settlement.map(|s| amount(s.api_rate())),
            amount_usd: settlement.map(|s| amount(s.amount_usd())),
            variance: record.variance.map(amount),
        }
    }
}

/// CSV row for an excluded input row
#[derive(Debug, Serialize, PartialEq)]
pub struct ExcludedCsvRow {
    pub feed: String,
    pub row: usize,
    pub error: String,
}

impl From<&ExcludedRow> for ExcludedCsvRow {
    fn from(excluded: &ExcludedRow) -> Self {
        ExcludedCsvRow {
            feed: excluded.feed.to_string(),
            row: excluded.source_row,
            error: excluded.error.to_string(),
        }
    }
}

/// Write the classified rows in CSV format
///
/// Only rows whose category is in `categories` are written; an empty slice writes
/// every row. The header is always written.
///
/// # Errors
///
/// Returns [`ReconcileError::Csv`] or [`ReconcileError::Io`] if writing fails.
pub fn write_classified_csv(
    result: &ReconciliationResult,
    categories: &[Category],
    output: &mut dyn Write,
) -> Result<(), ReconcileError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);

    writer.write_record(CLASSIFIED_HEADER)?;
    for record in result.filter(categories) {
        writer.serialize(ClassifiedCsvRow::from(record))?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the excluded rows in CSV format
///
/// # Errors
///
/// Returns [`ReconcileError::Csv`] or [`ReconcileError::Io`] if writing fails.
pub fn write_excluded_csv(
    excluded: &[ExcludedRow],
    output: &mut dyn Write,
) -> Result<(), ReconcileError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);

    writer.write_record(EXCLUDED_HEADER)?;
    for row in excluded {
        writer.serialize(ExcludedCsvRow::from(row))?;
    }
    writer.flush()?;

    Ok(())
}
