//! Settlement Reconciler Library
//! # Overview
//!
//! This library reconciles a partner Statement export against a Settlement report.
//! Each transaction is matched by its partner PIN and classified into one of three
//! categories:
//!
//! - **5**: Present in Both
//! - **6**: Present in Settlement but not in Statement
//! - **7**: Present in Statement but not in Settlement
//!
//! # Architecture
//!
//! - [`types`] - Core data types (sheets, normalized records, categories, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::statement`] / [`core::settlement`] - Feed normalizers
//!   - [`core::duplicates`] - Per-dataset duplicate tagging
//!   - [`core::engine`] - Classification by partner PIN
//!   - [`core::assembler`] - Ordering of the classified view
//!   - [`core::session`] - Latest-result cache
//! - [`io`] - Workbook/CSV ingestion and CSV output
//! - [`strategy`] - Sequential and parallel processing strategies
//!
//! # Row errors
//!
//! A Settlement row with a zero or non-numeric `APIRate` and a row without a
//! recognizable partner PIN are excluded from classification and reported in
//! [`ReconciliationResult::excluded`]. Schema violations abort the run.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{ReconciliationEngine, ReconciliationPipeline, ResultCache};
pub use io::{read_sheet, write_classified_csv, write_excluded_csv};
pub use types::{
    Category, ClassifiedRecord, ExcludedRow, Feed, NormalizedSettlementRecord,
    NormalizedStatementRecord, PartnerPin, ReconcileError, ReconciliationResult,
};
