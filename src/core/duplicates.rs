//! Per-dataset duplicate tagging
//!
//! A record is a duplicate when another record in the same dataset carries the same
//! partner PIN. Tagging never removes records from matching.

use crate::core::traits::KeyedRecord;
use std::collections::HashMap;
use tracing::debug;

/// Tags records whose PIN repeats within their own dataset
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateTagger;

impl DuplicateTagger {
    pub fn new() -> Self {
        DuplicateTagger
    }

    /// Set `is_duplicate` on every record of one dataset
    ///
    /// Returns the number of records tagged as duplicates.
    pub fn tag<R: KeyedRecord>(&self, records: &mut [R]) -> usize {
        let mut occurrences: HashMap<String, usize> = HashMap::new();
        for record in records.iter() {
            *occurrences
                .entry(record.partner_pin().to_string())
                .or_default() += 1;
        }

        let mut tagged = 0;
        for record in records.iter_mut() {
            let duplicate = occurrences
                .get(record.partner_pin())
                .is_some_and(|count| *count > 1);
            record.set_duplicate(duplicate);
            if duplicate {
                tagged += 1;
            }
        }

        debug!(
            records = records.len(),
            duplicates = tagged,
            "tagged duplicate partner PINs"
        );
        tagged
    }
}
