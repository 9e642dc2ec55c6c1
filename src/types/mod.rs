//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `sheet`: Raw rows and cell values handed over by ingestion
//! - `record`: Normalized Statement and Settlement records
//! - `classification`: Categories, classified rows and run results
//! - `error`: Error types for the reconciler

pub mod classification;
pub mod error;
pub mod record;
pub mod sheet;

pub use classification::{Category, ClassifiedRecord, ExcludedRow, ReconciliationResult};
pub use error::ReconcileError;
pub use record::{
    Feed, Fields, NormalizedSettlementRecord, NormalizedStatementRecord, PartnerPin,
};
pub use sheet::{column_letter, CellValue, RawRow, Sheet};
