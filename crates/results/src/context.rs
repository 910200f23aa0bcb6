//! Per-query execution context
//!
//! A [`QueryContext`] bundles everything one query's lifetime needs: the
//! compiled query, the index snapshot, the optional sort order, the
//! transaction layer's staleness oracle, and the telemetry sink. It also
//! collects highlight fragments produced while iterating, keyed by field.
//!
//! The context is immutable from the result set's point of view; the
//! fragment store uses a concurrent map so accumulation needs no `&mut`.

use dashmap::DashMap;
use sift_core::{MetricsSink, NoopMetrics, Query, Snapshot, SortSpec, StalenessOracle, TextFragment};
use std::sync::Arc;

/// Execution context for one query
pub struct QueryContext {
    query: Query,
    snapshot: Snapshot,
    sort: Option<SortSpec>,
    oracle: Arc<dyn StalenessOracle>,
    metrics: Arc<dyn MetricsSink>,
    fragments: DashMap<String, Vec<TextFragment>>,
}

impl QueryContext {
    /// Create a context with relevance ordering and no telemetry
    pub fn new(query: Query, snapshot: Snapshot, oracle: Arc<dyn StalenessOracle>) -> Self {
        QueryContext {
            query,
            snapshot,
            sort: None,
            oracle,
            metrics: Arc::new(NoopMetrics),
            fragments: DashMap::new(),
        }
    }

    /// Builder: set the sort order
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Builder: set the telemetry sink
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    /// The compiled query
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// The index snapshot this query runs against
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// The sort order, if any (absence means relevance order)
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// The transaction layer's staleness oracle
    pub fn oracle(&self) -> &dyn StalenessOracle {
        self.oracle.as_ref()
    }

    /// The telemetry sink
    pub fn metrics(&self) -> &dyn MetricsSink {
        self.metrics.as_ref()
    }

    /// Append highlight fragments produced for a field
    pub fn add_highlight_fragments(&self, field: &str, fragments: Vec<TextFragment>) {
        if fragments.is_empty() {
            return;
        }
        self.fragments
            .entry(field.to_string())
            .or_default()
            .extend(fragments);
    }

    /// Fragments accumulated so far for a field
    pub fn highlight_fragments(&self, field: &str) -> Option<Vec<TextFragment>> {
        self.fragments.get(field).map(|f| f.clone())
    }

    /// Remove and return the fragments accumulated for a field
    pub fn take_highlight_fragments(&self, field: &str) -> Option<Vec<TextFragment>> {
        self.fragments.remove(field).map(|(_, f)| f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::types::{DocOrdinal, IndexedDocument, Page, RecordId, ScoredMatch, Token};
    use sift_core::SnapshotReader;
    use std::io;

    struct NullReader;

    impl SnapshotReader for NullReader {
        fn search(
            &self,
            _query: &Query,
            _sort: Option<&SortSpec>,
            _limit: usize,
        ) -> io::Result<Page> {
            Ok(Page::empty())
        }

        fn search_after(
            &self,
            _after: &ScoredMatch,
            _query: &Query,
            _sort: Option<&SortSpec>,
            _limit: usize,
        ) -> io::Result<Page> {
            Ok(Page::empty())
        }

        fn doc(&self, _ordinal: DocOrdinal) -> io::Result<IndexedDocument> {
            Ok(IndexedDocument::new())
        }

        fn token_stream(&self, _ordinal: DocOrdinal, _field: &str) -> io::Result<Vec<Token>> {
            Ok(vec![])
        }
    }

    struct NullOracle;

    impl StalenessOracle for NullOracle {
        fn is_deleted(&self, _id: &RecordId) -> bool {
            false
        }

        fn is_updated_outside_txn(&self, _id: &RecordId) -> bool {
            false
        }
    }

    fn test_context() -> QueryContext {
        QueryContext::new(
            Query::compile("hello"),
            Snapshot::new(Arc::new(NullReader)),
            Arc::new(NullOracle),
        )
    }

    #[test]
    fn test_defaults() {
        let ctx = test_context();
        assert!(ctx.sort().is_none());
        assert_eq!(ctx.query().terms(), ["hello"]);
        assert_eq!(ctx.snapshot().ref_count(), 1);
    }

    #[test]
    fn test_with_sort() {
        let ctx = test_context().with_sort(SortSpec::new().by_field("title", false));
        assert_eq!(ctx.sort().unwrap().fields[0].field, "title");
    }

    #[test]
    fn test_fragments_accumulate_per_field() {
        let ctx = test_context();

        ctx.add_highlight_fragments("title", vec![TextFragment::new("<B>a</B>", 1.0)]);
        ctx.add_highlight_fragments("title", vec![TextFragment::new("<B>b</B>", 1.0)]);
        ctx.add_highlight_fragments("body", vec![TextFragment::new("<B>c</B>", 2.0)]);

        assert_eq!(ctx.highlight_fragments("title").unwrap().len(), 2);
        assert_eq!(ctx.highlight_fragments("body").unwrap().len(), 1);
        assert!(ctx.highlight_fragments("missing").is_none());
    }

    #[test]
    fn test_empty_fragment_batch_ignored() {
        let ctx = test_context();
        ctx.add_highlight_fragments("title", vec![]);
        assert!(ctx.highlight_fragments("title").is_none());
    }

    #[test]
    fn test_take_fragments_drains() {
        let ctx = test_context();
        ctx.add_highlight_fragments("title", vec![TextFragment::new("<B>a</B>", 1.0)]);

        assert_eq!(ctx.take_highlight_fragments("title").unwrap().len(), 1);
        assert!(ctx.highlight_fragments("title").is_none());
    }
}
