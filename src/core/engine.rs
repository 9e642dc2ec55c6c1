//! Reconciliation engine
//!
//! This module provides the ReconciliationEngine that classifies the tagged
//! Statement and Settlement records by partner PIN presence:
//!
//! - **5**: the PIN occurs in both datasets
//! - **6**: the PIN occurs in the Settlement dataset only
//! - **7**: the PIN occurs in the Statement dataset only
//!
//! Matching uses key presence. For a PIN with N Statement records and M Settlement
//! records the engine emits one category 5 row per Statement/Settlement pair sharing
//! the PIN (N × M rows). The pairs depend only on which records share the PIN, never
//! on their positions, so permuting either input yields the same rows. Every valid
//! record is referenced by at least one row, and by rows of exactly one category.

use crate::core::traits::KeyedRecord;
use crate::types::{
    Category, ClassifiedRecord, NormalizedSettlementRecord, NormalizedStatementRecord,
};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Engine output, one stream per category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryStreams {
    pub present_in_both: Vec<ClassifiedRecord>,
    pub settlement_only: Vec<ClassifiedRecord>,
    pub statement_only: Vec<ClassifiedRecord>,
}

impl CategoryStreams {
    /// Total number of classified rows
    pub fn len(&self) -> usize {
        self.present_in_both.len() + self.settlement_only.len() + self.statement_only.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Three-way classification over partner PINs
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    pub fn new() -> Self {
        ReconciliationEngine
    }

    /// Classify both datasets
    ///
    /// Records are expected in source order and already duplicate-tagged.
    pub fn reconcile(
        &self,
        statements: Vec<NormalizedStatementRecord>,
        settlements: Vec<NormalizedSettlementRecord>,
    ) -> CategoryStreams {
        let statements: Vec<Arc<NormalizedStatementRecord>> =
            statements.into_iter().map(Arc::new).collect();
        let settlements: Vec<Arc<NormalizedSettlementRecord>> =
            settlements.into_iter().map(Arc::new).collect();

        let statement_pins: HashSet<&str> =
            statements.iter().map(|s| s.partner_pin()).collect();

        let mut settlements_by_pin: HashMap<&str, Vec<&Arc<NormalizedSettlementRecord>>> =
            HashMap::new();
        for settlement in &settlements {
            settlements_by_pin
                .entry(settlement.partner_pin())
                .or_default()
                .push(settlement);
        }

        let mut streams = CategoryStreams::default();

        // Statement side: matched records are grouped per PIN for pairing,
        // unmatched ones go straight to category 7
        let mut matched_pins: Vec<&str> = Vec::new();
        let mut matched_statements: HashMap<&str, Vec<&Arc<NormalizedStatementRecord>>> =
            HashMap::new();
        for statement in &statements {
            let pin = statement.partner_pin();
            if settlements_by_pin.contains_key(pin) {
                let group = matched_statements.entry(pin).or_default();
                if group.is_empty() {
                    matched_pins.push(pin);
                }
                group.push(statement);
            } else {
                streams.statement_only.push(ClassifiedRecord {
                    category: Category::StatementOnly,
                    partner_pin: pin.to_string(),
                    statement: Some(Arc::clone(statement)),
                    settlement: None,
                    variance: None,
                });
            }
        }

        for pin in matched_pins {
            let (Some(stmts), Some(setts)) =
                (matched_statements.get(pin), settlements_by_pin.get(pin))
            else {
                continue;
            };
            let variance = variance(stmts, setts);
            for statement in stmts {
                for settlement in setts {
                    streams.present_in_both.push(ClassifiedRecord {
                        category: Category::PresentInBoth,
                        partner_pin: pin.to_string(),
                        statement: Some(Arc::clone(statement)),
                        settlement: Some(Arc::clone(settlement)),
                        variance,
                    });
                }
            }
        }

        // Settlement side: matched PINs are already covered by category 5
        for settlement in &settlements {
            if !statement_pins.contains(settlement.partner_pin()) {
                streams.settlement_only.push(ClassifiedRecord {
                    category: Category::SettlementOnly,
                    partner_pin: settlement.partner_pin.clone(),
                    statement: None,
                    settlement: Some(Arc::clone(settlement)),
                    variance: None,
                });
            }
        }

        streams
    }
}

/// Settlement USD total minus Statement settled total for one PIN
///
/// Statement rows without a settled amount count as zero. `None` on overflow.
fn variance(
    statements: &[&Arc<NormalizedStatementRecord>],
    settlements: &[&Arc<NormalizedSettlementRecord>],
) -> Option<Decimal> {
    let settled_usd = settlements
        .iter()
        .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.amount_usd()))?;
    let stated = statements.iter().try_fold(Decimal::ZERO, |acc, s| {
        acc.checked_add(s.settle_amount.unwrap_or(Decimal::ZERO))
    })?;
    settled_usd.checked_sub(stated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Fields;
    use std::collections::BTreeMap;

    fn statement(pin: &str, row: usize, settled: Option<i64>) -> NormalizedStatementRecord {
        NormalizedStatementRecord {
            partner_pin: pin.to_string(),
            source_row: row,
            settle_amount: settled.map(Decimal::from),
            fields: Fields::new(),
            is_duplicate: false,
        }
    }

    fn settlement(pin: &str, row: usize, payout: i64, rate: i64) -> NormalizedSettlementRecord {
        NormalizedSettlementRecord::new(
            pin.to_string(),
            row,
            Decimal::from(payout),
            Decimal::from(rate),
            Fields::new(),
        )
        .unwrap()
    }

    fn outcome(streams: &CategoryStreams) -> BTreeMap<(u8, String), usize> {
        let mut counts = BTreeMap::new();
        for record in streams
            .present_in_both
            .iter()
            .chain(&streams.settlement_only)
            .chain(&streams.statement_only)
        {
            *counts
                .entry((record.category.code(), record.partner_pin.clone()))
                .or_default() += 1;
        }
        counts
    }

    /// Sorted multiset of (PIN, settle amount, USD amount) over the category 5 rows
    fn paired_amounts(streams: &CategoryStreams) -> Vec<(String, Option<Decimal>, Decimal)> {
        let mut pairs: Vec<_> = streams
            .present_in_both
            .iter()
            .filter_map(|r| {
                let statement = r.statement.as_ref()?;
                let settlement = r.settlement.as_ref()?;
                Some((
                    r.partner_pin.clone(),
                    statement.settle_amount,
                    settlement.amount_usd(),
                ))
            })
            .collect();
        pairs.sort();
        pairs
    }

    #[test]
    fn test_pin_in_both_is_category_5() {
        let streams = ReconciliationEngine::new().reconcile(
            vec![statement("P1", 12, None)],
            vec![settlement("P1", 4, 100, 4)],
        );

        assert_eq!(streams.present_in_both.len(), 1);
        assert!(streams.settlement_only.is_empty());
        assert!(streams.statement_only.is_empty());

        let record = &streams.present_in_both[0];
        assert_eq!(record.partner_pin, "P1");
        assert_eq!(record.statement_row(), Some(12));
        assert_eq!(record.settlement_row(), Some(4));
    }

    #[test]
    fn test_settlement_only_is_category_6() {
        let streams =
            ReconciliationEngine::new().reconcile(vec![], vec![settlement("P9", 4, 10, 1)]);

        assert_eq!(streams.settlement_only.len(), 1);
        let record = &streams.settlement_only[0];
        assert_eq!(record.category, Category::SettlementOnly);
        assert_eq!(record.partner_pin, "P9");
        assert!(record.statement.is_none());
        assert!(record.variance.is_none());
    }

    #[test]
    fn test_statement_only_is_category_7() {
        let streams =
            ReconciliationEngine::new().reconcile(vec![statement("P3", 12, Some(5))], vec![]);

        assert_eq!(streams.statement_only.len(), 1);
        let record = &streams.statement_only[0];
        assert_eq!(record.category, Category::StatementOnly);
        assert_eq!(record.partner_pin, "P3");
        assert!(record.settlement.is_none());
    }

    #[test]
    fn test_statement_duplicates_each_produce_category_5() {
        let mut first = statement("P1", 12, None);
        let mut second = statement("P1", 13, None);
        first.is_duplicate = true;
        second.is_duplicate = true;

        let streams = ReconciliationEngine::new()
            .reconcile(vec![first, second], vec![settlement("P1", 4, 100, 4)]);

        assert_eq!(streams.present_in_both.len(), 2);
        let rows: Vec<(Option<usize>, Option<usize>)> = streams
            .present_in_both
            .iter()
            .map(|r| (r.statement_row(), r.settlement_row()))
            .collect();
        assert_eq!(rows, vec![(Some(12), Some(4)), (Some(13), Some(4))]);
        assert!(streams.settlement_only.is_empty());
    }

    #[test]
    fn test_one_statement_pairs_with_every_settlement() {
        let streams = ReconciliationEngine::new().reconcile(
            vec![statement("P1", 12, None)],
            vec![
                settlement("P1", 4, 10, 1),
                settlement("P1", 5, 20, 1),
                settlement("P1", 6, 30, 1),
            ],
        );

        let rows: Vec<(Option<usize>, Option<usize>)> = streams
            .present_in_both
            .iter()
            .map(|r| (r.statement_row(), r.settlement_row()))
            .collect();
        assert_eq!(
            rows,
            vec![(Some(12), Some(4)), (Some(12), Some(5)), (Some(12), Some(6))]
        );
    }

    #[test]
    fn test_variance_per_pin() {
        let streams = ReconciliationEngine::new().reconcile(
            vec![statement("P1", 12, Some(20)), statement("P1", 13, None)],
            vec![settlement("P1", 4, 100, 4), settlement("P1", 5, 10, 2)],
        );

        // (25 + 5) - (20 + 0)
        assert!(streams
            .present_in_both
            .iter()
            .all(|r| r.variance == Some(Decimal::from(10))));
    }

    #[test]
    fn test_categories_partition_the_records() {
        let statements = vec![
            statement("A", 12, None),
            statement("B", 13, None),
            statement("B", 14, None),
            statement("C", 15, None),
        ];
        let settlements = vec![
            settlement("B", 4, 1, 1),
            settlement("C", 5, 1, 1),
            settlement("C", 6, 1, 1),
            settlement("D", 7, 1, 1),
        ];

        let streams = ReconciliationEngine::new().reconcile(statements, settlements);

        let statement_pins: HashSet<&str> = ["A", "B", "C"].into_iter().collect();
        let settlement_pins: HashSet<&str> = ["B", "C", "D"].into_iter().collect();

        // 6 never has a statement PIN, 7 never has a settlement PIN
        assert!(streams
            .settlement_only
            .iter()
            .all(|r| !statement_pins.contains(r.partner_pin.as_str())));
        assert!(streams
            .statement_only
            .iter()
            .all(|r| !settlement_pins.contains(r.partner_pin.as_str())));

        // every statement row and settlement row is referenced by exactly one category
        let mut statement_categories: HashMap<usize, HashSet<Category>> = HashMap::new();
        let mut settlement_categories: HashMap<usize, HashSet<Category>> = HashMap::new();
        for record in streams
            .present_in_both
            .iter()
            .chain(&streams.settlement_only)
            .chain(&streams.statement_only)
        {
            if let Some(row) = record.statement_row() {
                statement_categories.entry(row).or_default().insert(record.category);
            }
            if let Some(row) = record.settlement_row() {
                settlement_categories.entry(row).or_default().insert(record.category);
            }
        }
        assert_eq!(statement_categories.len(), 4);
        assert_eq!(settlement_categories.len(), 4);
        assert!(statement_categories.values().all(|c| c.len() == 1));
        assert!(settlement_categories.values().all(|c| c.len() == 1));

        assert_eq!(streams.present_in_both.len(), 4);
        assert_eq!(streams.settlement_only.len(), 1);
        assert_eq!(streams.statement_only.len(), 1);
        assert_eq!(streams.len(), 6);
    }

    #[test]
    fn test_duplicates_on_both_sides_pair_every_combination() {
        let streams = ReconciliationEngine::new().reconcile(
            vec![statement("P1", 12, Some(10)), statement("P1", 13, Some(20))],
            vec![settlement("P1", 4, 10, 1), settlement("P1", 5, 20, 1)],
        );

        let rows: Vec<(Option<usize>, Option<usize>)> = streams
            .present_in_both
            .iter()
            .map(|r| (r.statement_row(), r.settlement_row()))
            .collect();
        assert_eq!(
            rows,
            vec![
                (Some(12), Some(4)),
                (Some(12), Some(5)),
                (Some(13), Some(4)),
                (Some(13), Some(5)),
            ]
        );
    }

    #[test]
    fn test_classification_ignores_input_order() {
        let statements = vec![
            statement("A", 12, None),
            statement("P1", 13, Some(10)),
            statement("P1", 14, Some(20)),
        ];
        let settlements = vec![
            settlement("P1", 4, 10, 1),
            settlement("D", 5, 1, 1),
            settlement("P1", 6, 20, 1),
            settlement("A", 7, 1, 1),
        ];

        let engine = ReconciliationEngine::new();
        let forward = engine.reconcile(statements.clone(), settlements.clone());

        // Only one side is permuted at a time
        let statements_reversed =
            engine.reconcile(statements.iter().rev().cloned().collect(), settlements.clone());
        let settlements_reversed =
            engine.reconcile(statements, settlements.into_iter().rev().collect());

        for permuted in [&statements_reversed, &settlements_reversed] {
            assert_eq!(outcome(&forward), outcome(permuted));
            assert_eq!(paired_amounts(&forward), paired_amounts(permuted));
        }
        assert_eq!(
            paired_amounts(&forward),
            vec![
                ("A".to_string(), None, Decimal::ONE),
                ("P1".to_string(), Some(Decimal::from(10)), Decimal::from(10)),
                ("P1".to_string(), Some(Decimal::from(10)), Decimal::from(20)),
                ("P1".to_string(), Some(Decimal::from(20)), Decimal::from(10)),
                ("P1".to_string(), Some(Decimal::from(20)), Decimal::from(20)),
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let streams = ReconciliationEngine::new().reconcile(vec![], vec![]);
        assert!(streams.is_empty());
    }
}
