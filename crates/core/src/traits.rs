//! Collaborator contracts at the seams of the result-set layer
//!
//! The index engine, the transaction layer and the telemetry sink are
//! external collaborators; this module defines the traits the result-set
//! core consumes. Engine calls are blocking and happen on the consumer's
//! thread at the point of iteration.

use crate::snapshot::Snapshot;
use crate::types::{
    DocOrdinal, IndexedDocument, Page, Query, RecordId, RecordMatch, ScoredMatch, SortSpec, Token,
    TMP_MATCH_FIELD,
};
use std::io;
use std::time::Duration;

// ============================================================================
// SnapshotReader
// ============================================================================

/// Read access to one immutable index snapshot
///
/// Supplied by the engine per snapshot. All methods are side-effect-free
/// reads and safe to repeat; failures surface as `io::Error` and the paging
/// layer decides the degrade policy.
pub trait SnapshotReader: Send + Sync {
    /// Fetch the first page of ranked matches for a query
    ///
    /// `Page::total_hits` must carry the raw total hit count for the query.
    fn search(&self, query: &Query, sort: Option<&SortSpec>, limit: usize) -> io::Result<Page>;

    /// Fetch the page following `after` (search-after semantics)
    ///
    /// The engine must never re-return an already-seen match for the same
    /// cursor and sort spec; the cursor strictly advances.
    fn search_after(
        &self,
        after: &ScoredMatch,
        query: &Query,
        sort: Option<&SortSpec>,
        limit: usize,
    ) -> io::Result<Page>;

    /// Fetch the stored fields of one document
    fn doc(&self, ordinal: DocOrdinal) -> io::Result<IndexedDocument>;

    /// Fetch the token stream of one document field (for highlighting)
    fn token_stream(&self, ordinal: DocOrdinal, field: &str) -> io::Result<Vec<Token>>;
}

// ============================================================================
// IndexEngine
// ============================================================================

/// Engine-level hooks reached from the result-set core
pub trait IndexEngine: Send + Sync {
    /// Name of the index, used for telemetry and log context
    fn index_name(&self) -> &str;

    /// Bookkeeping hook invoked exactly once per yielded (non-skipped) match
    fn on_record_added(&self, record: &RecordMatch, hit: &ScoredMatch);

    /// Drop the engine's hold on a shared snapshot
    ///
    /// Invoked at most once per iterator, on natural exhaustion, and only
    /// while the snapshot is still shared.
    fn release(&self, snapshot: &Snapshot);
}

// ============================================================================
// StalenessOracle
// ============================================================================

/// Decision oracle for transactional staleness, backed by the transaction
/// layer
///
/// All predicates are side-effect-free and idempotent; the core may call
/// them many times for the same identifier.
pub trait StalenessOracle: Send + Sync {
    /// Whether the record behind this identifier has been deleted
    fn is_deleted(&self, id: &RecordId) -> bool;

    /// Whether the record was updated after the snapshot was taken, and the
    /// update is not yet reflected in the index
    fn is_updated_outside_txn(&self, id: &RecordId) -> bool;

    /// Whether a matched document is a transaction-local provisional entry
    ///
    /// Derived from the reserved [`TMP_MATCH_FIELD`] marker written by the
    /// transaction layer into transaction-local documents.
    fn is_temporary_match(&self, doc: &IndexedDocument) -> bool {
        doc.has_field(TMP_MATCH_FIELD)
    }
}

// ============================================================================
// MetricsSink
// ============================================================================

/// Telemetry sink for per-query counters
///
/// Fire-and-forget: implementations must never affect control flow.
pub trait MetricsSink: Send + Sync {
    /// Record the elapsed latency of one index lookup
    fn record_lookup_latency(&self, index: &str, elapsed: Duration) {
        let _ = (index, elapsed);
    }

    /// Record the adjusted total-hit count reported for a query
    fn record_total_hits(&self, index: &str, hits: u64) {
        let _ = (index, hits);
    }
}

/// Metrics sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IndexedDocument;

    struct FixedOracle;

    impl StalenessOracle for FixedOracle {
        fn is_deleted(&self, _id: &RecordId) -> bool {
            false
        }

        fn is_updated_outside_txn(&self, _id: &RecordId) -> bool {
            false
        }
    }

    #[test]
    fn test_default_temporary_match_uses_marker_field() {
        let oracle = FixedOracle;

        let plain = IndexedDocument::new().with_field(crate::types::RECORD_ID_FIELD, "1:1");
        assert!(!oracle.is_temporary_match(&plain));

        let provisional = plain.clone().with_field(TMP_MATCH_FIELD, "1");
        assert!(oracle.is_temporary_match(&provisional));
    }

    #[test]
    fn test_noop_metrics_accepts_everything() {
        let sink = NoopMetrics;
        sink.record_lookup_latency("idx", Duration::from_millis(5));
        sink.record_total_hits("idx", 42);
    }
}
