//! Reconciliation output types
//!
//! A run produces a [`ReconciliationResult`]: the ordered list of
//! [`ClassifiedRecord`]s plus the rows that were excluded during normalization.

use super::error::ReconcileError;
use super::record::{Feed, NormalizedSettlementRecord, NormalizedStatementRecord, PartnerPin};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Outcome category of a reconciled transaction
///
/// The numeric codes (5, 6, 7) are the ones used by the reconciliation desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Present in both feeds (5)
    PresentInBoth,
    /// Present in the Settlement feed only (6)
    SettlementOnly,
    /// Present in the Statement feed only (7)
    StatementOnly,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 3] = [
        Category::PresentInBoth,
        Category::SettlementOnly,
        Category::StatementOnly,
    ];

    /// Numeric code of the category
    pub fn code(self) -> u8 {
        match self {
            Category::PresentInBoth => 5,
            Category::SettlementOnly => 6,
            Category::StatementOnly => 7,
        }
    }

    /// Category for a numeric code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            5 => Some(Category::PresentInBoth),
            6 => Some(Category::SettlementOnly),
            7 => Some(Category::StatementOnly),
            _ => None,
        }
    }

    /// Human-readable label shown next to the code
    pub fn label(self) -> &'static str {
        match self {
            Category::PresentInBoth => "Present in Both",
            Category::SettlementOnly => "Present in Settlement but not in Statement",
            Category::StatementOnly => "Present in Statement but not in Settlement",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One row of the reconciled view
///
/// Category 5 rows reference both records, category 6 only `settlement` and
/// category 7 only `statement`. Records are shared because a duplicated PIN may
/// pair one record with several counterparts.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    pub category: Category,
    pub partner_pin: PartnerPin,
    pub statement: Option<Arc<NormalizedStatementRecord>>,
    pub settlement: Option<Arc<NormalizedSettlementRecord>>,
    /// Settlement USD total minus Statement settled total for the PIN (category 5 only)
    pub variance: Option<Decimal>,
}

impl ClassifiedRecord {
    /// Statement source row, if the record references one
    pub fn statement_row(&self) -> Option<usize> {
        self.statement.as_ref().map(|s| s.source_row)
    }

    /// Settlement source row, if the record references one
    pub fn settlement_row(&self) -> Option<usize> {
        self.settlement.as_ref().map(|s| s.source_row)
    }
}

/// A raw row rejected during normalization
#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedRow {
    pub feed: Feed,
    /// 1-based sheet row
    pub source_row: usize,
    pub error: ReconcileError,
}

/// Complete output of one reconciliation run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReconciliationResult {
    /// Classified rows ordered by category, then source row
    pub records: Vec<ClassifiedRecord>,
    /// Rows excluded by the normalizers, in feed then row order
    pub excluded: Vec<ExcludedRow>,
}

impl ReconciliationResult {
    /// Rows of a single category, in output order
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &ClassifiedRecord> {
        self.records.iter().filter(move |r| r.category == category)
    }

    /// Rows whose category is in `categories`; an empty slice selects everything
    pub fn filter<'a>(
        &'a self,
        categories: &'a [Category],
    ) -> impl Iterator<Item = &'a ClassifiedRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| categories.is_empty() || categories.contains(&r.category))
    }

    /// Number of rows per category (every category present, possibly zero)
    pub fn counts(&self) -> BTreeMap<Category, usize> {
        let mut counts: BTreeMap<Category, usize> =
            Category::ALL.iter().map(|c| (*c, 0)).collect();
        for record in &self.records {
            *counts.entry(record.category).or_default() += 1;
        }
        counts
    }
}
