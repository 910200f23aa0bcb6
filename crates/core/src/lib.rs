//! Core types and collaborator contracts for sift result sets
//!
//! This crate provides:
//! - Value types shared between the index engine, the transaction layer
//!   and the result-set core (queries, pages, documents, record matches)
//! - The error taxonomy and `Result` alias
//! - The [`Snapshot`] handle with an explicit, visible hold count
//! - Collaborator traits: [`SnapshotReader`], [`IndexEngine`],
//!   [`StalenessOracle`], [`MetricsSink`]
//! - Highlight configuration parsing from query metadata
//! - The reference tokenizer

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod snapshot;
pub mod tokenizer;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::HighlightConfig;
pub use error::{Error, Result};
pub use snapshot::Snapshot;
pub use traits::{IndexEngine, MetricsSink, NoopMetrics, SnapshotReader, StalenessOracle};
pub use types::{
    DocOrdinal, IndexedDocument, Page, Query, RecordId, RecordMatch, ScoredMatch, SortField,
    SortKey, SortSpec, TextFragment, Token, RECORD_ID_FIELD, TMP_MATCH_FIELD,
};
