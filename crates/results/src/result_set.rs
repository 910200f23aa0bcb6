//! Lazy, transaction-reconciled result sets
//!
//! [`LazyResultSet`] composes the paging cursor, the staleness oracle, the
//! result mapper and the highlighter into a read-only, sized, iterable
//! collection over one query's matches:
//!
//! - the first page and the deleted-match count are computed eagerly at
//!   construction (one O(hits) sizing pass, bounded by the raw total);
//! - everything else is lazy: the iterator pulls matches page by page,
//!   resolves each to a record identifier, applies the skip decision, and
//!   only for surviving matches computes highlights, fires the engine's
//!   bookkeeping hook and yields;
//! - on natural exhaustion the iterator releases its hold on the snapshot,
//!   once, if the snapshot is still shared at that moment.
//!
//! All engine calls are blocking and happen on the consumer's thread at the
//! point of `next()`; no locks are held across them.

use crate::context::QueryContext;
use crate::cursor::SnapshotCursor;
use crate::highlight::FragmentHighlighter;
use crate::mapper::ResultMapper;
use serde_json::Value;
use sift_core::types::{DocOrdinal, Page, RecordMatch, ScoredMatch};
use sift_core::{Error, HighlightConfig, IndexEngine, Result};
use tracing::error;

// ============================================================================
// LazyResultSet
// ============================================================================

/// Read-only, forward-only collection of reconciled query results
pub struct LazyResultSet<'a> {
    engine: &'a dyn IndexEngine,
    ctx: &'a QueryContext,
    config: HighlightConfig,
    highlighter: Option<FragmentHighlighter>,
    first_page: Page,
    raw_total_hits: u64,
    deleted_match_count: u64,
}

impl std::fmt::Debug for LazyResultSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyResultSet")
            .field("config", &self.config)
            .field("first_page", &self.first_page)
            .field("raw_total_hits", &self.raw_total_hits)
            .field("deleted_match_count", &self.deleted_match_count)
            .finish_non_exhaustive()
    }
}

impl<'a> LazyResultSet<'a> {
    /// Run the context's query and build the result set
    ///
    /// Fetches the first page and scans all raw hits against the oracle's
    /// deletion predicate to fix the adjusted size. Page-fetch I/O failures
    /// degrade to an empty result set; a document missing its record
    /// identifier is a fatal [`Error::MalformedDocument`].
    pub fn new(
        engine: &'a dyn IndexEngine,
        ctx: &'a QueryContext,
        config: HighlightConfig,
    ) -> Result<Self> {
        let cursor = SnapshotCursor::new(ctx, engine.index_name());
        let first_page = cursor.first_page();
        let raw_total_hits = first_page.total_hits;
        let deleted_match_count = count_deleted_matches(ctx, &cursor, &first_page)?;

        let highlighter = if config.is_enabled() {
            Some(FragmentHighlighter::for_query(ctx.query(), &config))
        } else {
            None
        };

        Ok(LazyResultSet {
            engine,
            ctx,
            config,
            highlighter,
            first_page,
            raw_total_hits,
            deleted_match_count,
        })
    }

    /// Build a result set taking the highlight configuration from a query
    /// metadata value bag (see [`HighlightConfig::from_metadata`])
    pub fn with_metadata(
        engine: &'a dyn IndexEngine,
        ctx: &'a QueryContext,
        metadata: &Value,
    ) -> Result<Self> {
        Self::new(engine, ctx, HighlightConfig::from_metadata(metadata))
    }

    /// Adjusted result count: `max(0, raw_total_hits - deleted_match_count)`
    ///
    /// O(1) after construction. Deletions are subtracted exactly; matches
    /// that are updated outside the transaction (and not superseded by a
    /// temporary match) are filtered lazily during iteration instead, so
    /// this can slightly overestimate the number of elements actually
    /// yielded. An exact count would need a second full scan; the
    /// overestimate is an accepted design limitation.
    pub fn size(&self) -> usize {
        self.raw_total_hits.saturating_sub(self.deleted_match_count) as usize
    }

    /// Whether the adjusted result count is zero
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Raw total hit count reported by the engine
    pub fn raw_total_hits(&self) -> u64 {
        self.raw_total_hits
    }

    /// Number of raw hits the oracle reported as deleted
    pub fn deleted_match_count(&self) -> u64 {
        self.deleted_match_count
    }

    /// Create a fresh forward-only iterator over the result set
    ///
    /// Each call starts from the first page. One iterator serves one
    /// consumer; it is not safe to advance from multiple threads.
    pub fn iter(&self) -> ResultIter<'_> {
        self.ctx
            .metrics()
            .record_total_hits(self.engine.index_name(), self.size() as u64);

        ResultIter {
            engine: self.engine,
            ctx: self.ctx,
            mapper: ResultMapper::new(self.ctx.oracle(), &self.config.fields),
            highlighter: self.highlighter.as_ref(),
            max_fragments: self.config.max_fragments,
            cursor: SnapshotCursor::new(self.ctx, self.engine.index_name()),
            buf: self.first_page.matches.clone(),
            local: 0,
            yielded: 0,
            adjusted: self.size() as u64,
            released: false,
            done: false,
        }
    }
}

impl<'s, 'a> IntoIterator for &'s LazyResultSet<'a> {
    type Item = Result<RecordMatch>;
    type IntoIter = ResultIter<'s>;

    fn into_iter(self) -> ResultIter<'s> {
        self.iter()
    }
}

/// Eager sizing pass: count raw hits whose record the oracle reports deleted
///
/// Walks every page once (re-fetching continuation pages through the
/// cursor; page fetches are side-effect-free reads and safe to repeat),
/// bounded by the engine-reported total. Update-staleness is intentionally
/// not counted here; it is checked lazily per element during iteration.
fn count_deleted_matches(
    ctx: &QueryContext,
    cursor: &SnapshotCursor<'_>,
    first_page: &Page,
) -> Result<u64> {
    let total = first_page.total_hits;
    let mut deleted = 0u64;
    let mut seen = 0u64;
    let mut current = first_page.matches.clone();

    while !current.is_empty() && seen < total {
        for hit in &current {
            seen += 1;
            let doc = match ctx.snapshot().reader().doc(hit.doc) {
                Ok(doc) => doc,
                Err(e) => {
                    error!(doc = hit.doc, error = %e, "failed to fetch document during sizing scan");
                    return Ok(deleted);
                }
            };
            let id = ResultMapper::record_id(&doc, hit.doc)?;
            if ctx.oracle().is_deleted(&id) {
                deleted += 1;
            }
            if seen == total {
                break;
            }
        }
        if seen >= total {
            break;
        }
        let after = match current.last() {
            Some(last) => last.clone(),
            None => break,
        };
        let next = cursor.next_page(&after);
        if next.is_empty() {
            break;
        }
        current = next.matches;
    }

    Ok(deleted)
}

// ============================================================================
// ResultIter
// ============================================================================

/// Forward-only iterator over a [`LazyResultSet`]
///
/// Owns its full cursor state (page buffer, local offset, running count)
/// with a back-reference to the immutable query context, so multiple
/// iterators over the same result set never alias each other's progress.
pub struct ResultIter<'s> {
    engine: &'s dyn IndexEngine,
    ctx: &'s QueryContext,
    mapper: ResultMapper<'s>,
    highlighter: Option<&'s FragmentHighlighter>,
    max_fragments: usize,
    cursor: SnapshotCursor<'s>,
    buf: Vec<ScoredMatch>,
    local: usize,
    yielded: u64,
    adjusted: u64,
    released: bool,
    done: bool,
}

impl<'s> ResultIter<'s> {
    /// Whether another element is expected
    ///
    /// On transitioning to `false` this releases the iterator's hold on the
    /// snapshot — exactly once, and only if the snapshot is still shared at
    /// that moment. A sole holder leaves release to its owning scope.
    pub fn has_next(&mut self) -> bool {
        let more = !self.done && self.yielded < self.adjusted;
        if !more {
            self.release_if_shared();
        }
        more
    }

    fn release_if_shared(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let snapshot = self.ctx.snapshot();
        if snapshot.is_shared() {
            self.engine.release(snapshot);
        }
    }

    /// Pull the next raw match, crossing page boundaries transparently
    ///
    /// Returns `None` when the engine has no further matches (including the
    /// degraded empty page after an I/O failure).
    fn fetch_next(&mut self) -> Option<ScoredMatch> {
        if self.local == self.buf.len() {
            let after = self.buf.last()?.clone();
            let page = self.cursor.next_page(&after);
            if page.is_empty() {
                return None;
            }
            self.buf = page.matches;
            self.local = 0;
        }
        let hit = self.buf[self.local].clone();
        self.local += 1;
        Some(hit)
    }

    /// Stale-match decision: deleted, or updated outside the transaction
    /// without a superseding temporary match
    fn skip(&self, record: &RecordMatch) -> bool {
        let oracle = self.ctx.oracle();
        oracle.is_deleted(&record.record_id)
            || (oracle.is_updated_outside_txn(&record.record_id) && !record.is_temporary)
    }

    fn attach_highlights(
        &self,
        highlighter: &FragmentHighlighter,
        record: &RecordMatch,
        doc: DocOrdinal,
    ) -> Result<()> {
        for (field, text) in &record.fields {
            let tokens = self
                .ctx
                .snapshot()
                .reader()
                .token_stream(doc, field)
                .map_err(|e| Error::HighlightFailure {
                    field: field.clone(),
                    source: Box::new(e),
                })?;
            let fragments = highlighter
                .highlight(text, &tokens, self.max_fragments)
                .map_err(|e| Error::HighlightFailure {
                    field: field.clone(),
                    source: Box::new(e),
                })?;
            self.ctx.add_highlight_fragments(field, fragments);
        }
        Ok(())
    }

    /// Advance to the next non-skipped match
    fn advance(&mut self) -> Option<Result<RecordMatch>> {
        loop {
            let hit = match self.fetch_next() {
                Some(hit) => hit,
                None => {
                    self.done = true;
                    return None;
                }
            };

            let doc = match self.ctx.snapshot().reader().doc(hit.doc) {
                Ok(doc) => doc,
                Err(e) => {
                    error!(doc = hit.doc, error = %e, "failed to fetch document from index snapshot");
                    self.done = true;
                    return None;
                }
            };

            let record = match self.mapper.resolve(&doc, hit.doc) {
                Ok(record) => record,
                Err(e) => return Some(Err(e)),
            };

            if Self::skip(self, &record) {
                continue;
            }

            if let Some(highlighter) = self.highlighter {
                if let Err(e) = self.attach_highlights(highlighter, &record, hit.doc) {
                    return Some(Err(e));
                }
            }

            self.engine.on_record_added(&record, &hit);
            self.yielded += 1;
            return Some(Ok(record));
        }
    }
}

impl Iterator for ResultIter<'_> {
    type Item = Result<RecordMatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        match self.advance() {
            Some(item) => Some(item),
            None => {
                // Degraded or early exhaustion counts as exhaustion.
                self.release_if_shared();
                None
            }
        }
    }
}
