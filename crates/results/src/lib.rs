//! Transactional result sets for full-text index queries
//!
//! This crate turns a ranked match set from an immutable index snapshot
//! into a lazy, forward-only sequence of resolved record matches,
//! reconciled against an in-flight transaction's view:
//!
//! - [`QueryContext`] carries the query, snapshot, sort order, staleness
//!   oracle and telemetry sink for one query's lifetime
//! - [`SnapshotCursor`] pages through matches with search-after semantics
//! - [`ResultMapper`] resolves raw indexed documents to record identifiers
//! - [`FragmentHighlighter`] produces marked excerpts for configured fields
//! - [`LazyResultSet`] / [`ResultIter`] tie it together: eager sizing,
//!   lazy per-element staleness filtering, highlight-then-yield, and an
//!   exactly-once snapshot release on exhaustion
//! - [`RecordSet`] adapts the narrow result set to a broader read-only
//!   collection contract

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod context;
pub mod cursor;
pub mod highlight;
pub mod mapper;
pub mod result_set;

pub use adapter::RecordSet;
pub use context::QueryContext;
pub use cursor::{SnapshotCursor, PAGE_SIZE};
pub use highlight::{FragmentError, FragmentHighlighter, FRAGMENT_SIZE};
pub use mapper::ResultMapper;
pub use result_set::{LazyResultSet, ResultIter};
