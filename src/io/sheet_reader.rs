//! Sheet ingestion from Excel workbooks and CSV files
//!
//! Reads the first worksheet of a workbook (via calamine) or a headerless CSV file
//! into a [`Sheet`]. Row positions are preserved exactly: leading blank rows and
//! columns that the workbook range omits are padded back. The normalizers' fixed drop
//! rules depend on this.
//!
//! CSV records are numbered in order. Spreadsheet CSV exports write empty rows as
//! delimiter-only lines (`,,,`), which are kept as blank rows; fully empty lines are
//! skipped by the CSV parser and do not count as rows.
//!
//! # Limits
//!
//! - Only `.xlsx`, `.xlsm`, `.xls`, `.ods` and `.csv` files are accepted
//! - Files larger than [`MAX_INPUT_BYTES`] are rejected before decoding

use crate::types::{CellValue, RawRow, ReconcileError, Sheet};
use calamine::{Data, Reader};
use csv::{ReaderBuilder, Trim};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Largest accepted input file (16 MiB)
pub const MAX_INPUT_BYTES: u64 = 16 * 1024 * 1024;

/// Extensions decoded through calamine
pub const SPREADSHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// Read the first sheet of a workbook or a CSV file
///
/// # Errors
///
/// - [`ReconcileError::FileNotFound`] if the path does not exist
/// - [`ReconcileError::FileTooLarge`] above [`MAX_INPUT_BYTES`]
/// - [`ReconcileError::UnsupportedFormat`] for any other extension
/// - [`ReconcileError::Workbook`] / [`ReconcileError::Csv`] when decoding fails
pub fn read_sheet(path: &Path) -> Result<Sheet, ReconcileError> {
    let path_name = path.display().to_string();
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ReconcileError::FileNotFound {
            path: path_name.clone(),
        },
        _ => ReconcileError::from(e),
    })?;

    if metadata.len() > MAX_INPUT_BYTES {
        return Err(ReconcileError::FileTooLarge {
            path: path_name,
            size: metadata.len(),
            limit: MAX_INPUT_BYTES,
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let sheet = if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        read_workbook(path)?
    } else if extension == "csv" {
        read_csv(path)?
    } else {
        return Err(ReconcileError::UnsupportedFormat { path: path_name });
    };

    debug!(
        path = %path_name,
        rows = sheet.row_count(),
        columns = sheet.column_count(),
        "read sheet"
    );
    Ok(sheet)
}

fn sheet_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

fn read_workbook(path: &Path) -> Result<Sheet, ReconcileError> {
    let mut workbook = calamine::open_workbook_auto(path)?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ReconcileError::Workbook {
            message: format!("{} contains no worksheets", path.display()),
        })?;
    let range = workbook.worksheet_range(&name)?;

    // The range starts at the first non-empty cell; shift it back to A1
    let (start_row, start_column) = range.start().unwrap_or((0, 0));
    let rows = range
        .rows()
        .enumerate()
        .map(|(i, cells)| {
            let mut values = vec![CellValue::Empty; start_column as usize];
            values.extend(cells.iter().map(cell_value));
            RawRow::new(start_row as usize + i + 1, values)
        })
        .collect();

    Ok(Sheet {
        name: format!("{}/{}", sheet_name(path), name),
        rows,
    })
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::text(s.as_str()),
        other => CellValue::text(other.to_string()),
    }
}

fn read_csv(path: &Path) -> Result<Sheet, ReconcileError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        rows.push(RawRow::new(i + 1, record.iter().map(CellValue::text).collect()));
    }

    Ok(Sheet {
        name: sheet_name(path),
        rows,
    })
}
