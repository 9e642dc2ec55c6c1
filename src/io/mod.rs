//! I/O module
//!
//! Handles sheet ingestion and CSV output.
//!
//! # Components
//!
//! - `sheet_reader` - Excel workbook / CSV file → [`Sheet`](crate::types::Sheet)
//! - `csv_format` - CSV format handling for classified and excluded rows

pub mod csv_format;
pub mod sheet_reader;

pub use csv_format::{write_classified_csv, write_excluded_csv};
pub use sheet_reader::{read_sheet, MAX_INPUT_BYTES};
