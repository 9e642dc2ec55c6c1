//! Core business logic module
//!
//! This module contains the reconciliation components:
//! - `traits` - Normalizer and keyed-record abstractions
//! - `header` - Column naming from a feed's header row
//! - `statement` - Statement feed normalizer
//! - `settlement` - Settlement feed normalizer
//! - `duplicates` - Per-dataset duplicate tagging
//! - `engine` - Three-way classification by partner PIN
//! - `assembler` - Ordering and merging of the classified rows
//! - `pipeline` - Tagging → classification → assembly
//! - `session` - Latest-result cache for the display layer

pub mod assembler;
pub mod duplicates;
pub mod engine;
pub mod header;
pub mod pipeline;
pub mod session;
pub mod settlement;
pub mod statement;
pub mod traits;

pub use assembler::ResultAssembler;
pub use duplicates::DuplicateTagger;
pub use engine::{CategoryStreams, ReconciliationEngine};
pub use pipeline::ReconciliationPipeline;
pub use session::{CachedRun, ResultCache, RunId};
pub use settlement::SettlementNormalizer;
pub use statement::StatementNormalizer;
pub use traits::{KeyedRecord, NormalizedDataset, Normalizer};
