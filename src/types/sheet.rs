//! Raw sheet types handed over by the ingestion layer
//!
//! A [`Sheet`] is an ordered list of [`RawRow`]s, each remembering its absolute
//! 1-based position in the original worksheet. The normalizers rely on those
//! positions for the fixed per-feed drop rules, so ingestion must never renumber rows.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// A single cell as decoded from a spreadsheet or CSV file
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Blank cell
    #[default]
    Empty,
    /// Text content, kept exactly as read
    Text(String),
    /// Integer content
    Int(i64),
    /// Floating point content (Excel stores most numbers this way)
    Float(f64),
    /// Boolean content
    Bool(bool),
}

impl CellValue {
    /// Build a cell from text, mapping blank text to [`CellValue::Empty`]
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }

    /// Whether the cell carries no usable content
    ///
    /// Blank text and the literal `nan` left behind by some exporters count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => {
                let s = s.trim();
                s.is_empty() || s.eq_ignore_ascii_case("nan")
            }
            CellValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Render the cell as an identifier string
    ///
    /// Integral floats lose their fractional part (`123456789.0` becomes
    /// `"123456789"`), text is trimmed, and empty cells yield `None`.
    pub fn as_key(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        match self {
            CellValue::Text(s) => {
                let s = s.trim();
                match integral_text(s) {
                    Some(digits) => Some(digits),
                    None => Some(s.to_string()),
                }
            }
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
                Some(format!("{}", *f as i64))
            }
            CellValue::Float(f) => Some(f.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Empty => None,
        }
    }

    /// Parse the cell as a decimal amount
    ///
    /// Text may contain thousands separators (`"27,239.00"`). Returns `None` for
    /// empty or non-numeric cells.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            CellValue::Int(i) => Some(Decimal::from(*i)),
            CellValue::Float(f) if f.is_finite() => Decimal::try_from(*f).ok(),
            CellValue::Text(s) => {
                let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
                if cleaned.is_empty() {
                    return None;
                }
                Decimal::from_str(&cleaned)
                    .or_else(|_| Decimal::from_scientific(&cleaned))
                    .ok()
            }
            _ => None,
        }
    }
}

/// `"123456789.0"` style text produced by float round-trips, reduced to its digits
fn integral_text(s: &str) -> Option<String> {
    let (whole, frac) = s.split_once('.')?;
    let digits = whole.strip_prefix('-').unwrap_or(whole);
    if digits.is_empty()
        || !digits.chars().all(|c| c.is_ascii_digit())
        || !frac.chars().all(|c| c == '0')
    {
        return None;
    }
    Some(whole.to_string())
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// One row of a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based row position in the original worksheet
    pub index: usize,
    /// Cells in column order
    pub cells: Vec<CellValue>,
}

impl RawRow {
    pub fn new(index: usize, cells: Vec<CellValue>) -> Self {
        Self { index, cells }
    }

    /// Cell at a 0-based column position; missing trailing cells read as empty
    pub fn cell(&self, column: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(column).unwrap_or(&EMPTY)
    }

    /// Whether every cell in the row is empty
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_empty)
    }
}

/// An ordered collection of rows as read from one worksheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    /// Worksheet (or file) name, used in log output only
    pub name: String,
    /// Rows in sheet order
    pub rows: Vec<RawRow>,
}

impl Sheet {
    /// Build a sheet from row contents, numbering rows from 1
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows: rows
                .into_iter()
                .enumerate()
                .map(|(i, cells)| RawRow::new(i + 1, cells))
                .collect(),
        }
    }

    /// Number of sheet rows spanned, i.e. the last row position
    ///
    /// Readers may omit blank rows, so this can exceed `rows.len()`.
    pub fn row_count(&self) -> usize {
        self.rows.iter().map(|r| r.index).max().unwrap_or(0)
    }

    /// Widest row in the sheet
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// Row at a 1-based sheet position
    pub fn row(&self, index: usize) -> Option<&RawRow> {
        self.rows.iter().find(|r| r.index == index)
    }
}

/// Spreadsheet-style letter for a 0-based column (`0` → `A`, `27` → `AB`)
pub fn column_letter(column: usize) -> String {
    let mut n = column + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
