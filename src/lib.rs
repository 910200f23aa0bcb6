//! sift - transactional result sets for full-text index queries
//!
//! sift sits between a full-text inverted-index engine and a database's
//! record layer. It converts a ranked match set produced against an index
//! snapshot into a lazy, forward-only sequence of stable record identifiers,
//! reconciling the (possibly stale) snapshot with an in-flight transaction's
//! pending deletions and updates, and optionally attaching highlighted text
//! fragments per match.
//!
//! # Quick Start
//!
//! ```ignore
//! use siftdb::{HighlightConfig, LazyResultSet, Query, QueryContext, Snapshot};
//!
//! let query = Query::compile("rust embedded database");
//! let snapshot = Snapshot::new(reader);
//! let ctx = QueryContext::new(query, snapshot, oracle);
//!
//! let results = LazyResultSet::new(&engine, &ctx, HighlightConfig::default())?;
//! for record in results.iter() {
//!     println!("{}", record?.record_id);
//! }
//! ```
//!
//! # Architecture
//!
//! The engine (index storage, query compilation, scoring) and the
//! transaction log are external collaborators reached through the
//! [`SnapshotReader`], [`IndexEngine`] and [`StalenessOracle`] traits.
//! This crate owns only the reconciliation layer: paging, staleness
//! filtering, record resolution, highlighting, and snapshot lifetime.

// Re-export the public API from the member crates
pub use sift_core::*;
pub use sift_results::*;
