//! Search-after paging over an index snapshot
//!
//! A [`SnapshotCursor`] is a pure paging primitive with no transaction
//! awareness: it fetches the first page for a query and, seeded with the
//! last match of the previous page, each following page. Pages are fetched
//! with a fixed size balancing memory against round-trip count.
//!
//! Engine I/O failures degrade to an empty page: the caller cannot usefully
//! recover mid-iteration, so the failure is logged and iteration terminates
//! as if exhausted. This is a deliberate availability-over-completeness
//! tradeoff.

use crate::context::QueryContext;
use sift_core::{MetricsSink, Page, Query, ScoredMatch, Snapshot, SortSpec};
use std::time::Instant;
use tracing::error;

/// Fixed page size for snapshot paging
///
/// Not user-configurable in this layer.
pub const PAGE_SIZE: usize = 10_000;

/// Forward-only paging cursor over one snapshot
pub struct SnapshotCursor<'a> {
    snapshot: &'a Snapshot,
    query: &'a Query,
    sort: Option<&'a SortSpec>,
    metrics: &'a dyn MetricsSink,
    index_name: &'a str,
}

impl<'a> SnapshotCursor<'a> {
    /// Create a cursor over the context's snapshot and query
    pub fn new(ctx: &'a QueryContext, index_name: &'a str) -> Self {
        SnapshotCursor {
            snapshot: ctx.snapshot(),
            query: ctx.query(),
            sort: ctx.sort(),
            metrics: ctx.metrics(),
            index_name,
        }
    }

    /// Fetch the first page of matches
    pub fn first_page(&self) -> Page {
        let start = Instant::now();
        let page = self
            .snapshot
            .reader()
            .search(self.query, self.sort, PAGE_SIZE)
            .unwrap_or_else(|e| {
                error!(
                    index = self.index_name,
                    query = self.query.expression(),
                    error = %e,
                    "failed to fetch first page from index"
                );
                Page::empty()
            });
        self.metrics
            .record_lookup_latency(self.index_name, start.elapsed());
        page
    }

    /// Fetch the page following `after` (search-after semantics)
    pub fn next_page(&self, after: &ScoredMatch) -> Page {
        let start = Instant::now();
        let page = self
            .snapshot
            .reader()
            .search_after(after, self.query, self.sort, PAGE_SIZE)
            .unwrap_or_else(|e| {
                error!(
                    index = self.index_name,
                    query = self.query.expression(),
                    error = %e,
                    "failed to fetch next page from index"
                );
                Page::empty()
            });
        self.metrics
            .record_lookup_latency(self.index_name, start.elapsed());
        page
    }
}
