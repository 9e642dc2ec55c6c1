//! Column naming from a feed's header row

use crate::types::{column_letter, Fields, RawRow};
use std::collections::HashSet;

/// Column names resolved from a header row
///
/// Blank or repeated header cells fall back to the spreadsheet column letter, with a
/// numeric suffix if that letter is already taken, so every column keeps a distinct
/// name.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRow {
    names: Vec<String>,
}

impl HeaderRow {
    /// Resolve names for `width` columns from an optional header row
    pub fn new(row: Option<&RawRow>, width: usize) -> Self {
        let mut seen = HashSet::new();
        let names = (0..width)
            .map(|column| {
                let base = row
                    .and_then(|r| r.cell(column).as_key())
                    .filter(|name| !seen.contains(name))
                    .unwrap_or_else(|| column_letter(column));

                // A letter fallback can itself collide with a header text
                let mut name = base.clone();
                let mut suffix = 2;
                while seen.contains(&name) {
                    name = format!("{}_{}", base, suffix);
                    suffix += 1;
                }
                seen.insert(name.clone());
                name
            })
            .collect();

        Self { names }
    }

    /// Column position of a header, ignoring surrounding whitespace and ASCII case
    pub fn position(&self, header: &str) -> Option<usize> {
        self.names
            .iter()
            .position(|name| name.trim().eq_ignore_ascii_case(header.trim()))
    }

    /// Name of a column
    pub fn name(&self, column: usize) -> Option<&str> {
        self.names.get(column).map(String::as_str)
    }

    /// Carry every cell of a row forward under its column name
    pub fn fields(&self, row: &RawRow) -> Fields {
        self.names
            .iter()
            .enumerate()
            .map(|(column, name)| (name.clone(), row.cell(column).clone()))
            .collect()
    }
}
