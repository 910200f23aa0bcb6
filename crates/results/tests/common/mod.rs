//! Shared in-memory engine fixture for the integration suites

#![allow(dead_code)]

use sift_core::tokenizer::tokenize_with_offsets;
use sift_core::types::{
    DocOrdinal, IndexedDocument, Page, Query, RecordId, RecordMatch, ScoredMatch, SortSpec, Token,
    RECORD_ID_FIELD,
};
use sift_core::{IndexEngine, MetricsSink, Snapshot, SnapshotReader, StalenessOracle};
use std::collections::HashSet;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Build a document carrying a record identifier and a body field
pub fn doc(rid: &str, body: &str) -> IndexedDocument {
    IndexedDocument::new()
        .with_field(RECORD_ID_FIELD, rid)
        .with_field("body", body)
}

// ============================================================================
// MemoryReader
// ============================================================================

/// In-memory snapshot reader over a fixed document list
///
/// A document matches when any field value contains any query term
/// (case-insensitive); an empty term list matches everything. Ordinals are
/// positions in the document list; scores decrease with position so the
/// ranked order is the list order. Failure injection flags cover the three
/// engine I/O boundaries.
pub struct MemoryReader {
    docs: Vec<IndexedDocument>,
    fail_pages: AtomicBool,
    fail_docs: Mutex<HashSet<DocOrdinal>>,
    fail_token_field: Mutex<Option<String>>,
    token_stream_calls: AtomicUsize,
}

impl MemoryReader {
    pub fn new(docs: Vec<IndexedDocument>) -> Self {
        MemoryReader {
            docs,
            fail_pages: AtomicBool::new(false),
            fail_docs: Mutex::new(HashSet::new()),
            fail_token_field: Mutex::new(None),
            token_stream_calls: AtomicUsize::new(0),
        }
    }

    /// Make every page fetch fail from now on
    pub fn fail_pages(&self) {
        self.fail_pages.store(true, Ordering::SeqCst);
    }

    /// Make fetching this document fail from now on
    pub fn fail_doc(&self, ordinal: DocOrdinal) {
        self.fail_docs.lock().unwrap().insert(ordinal);
    }

    /// Make token streams for this field fail from now on
    pub fn fail_token_field(&self, field: &str) {
        *self.fail_token_field.lock().unwrap() = Some(field.to_string());
    }

    /// Number of token_stream calls served so far
    pub fn token_stream_calls(&self) -> usize {
        self.token_stream_calls.load(Ordering::SeqCst)
    }

    fn matched(&self, query: &Query) -> Vec<ScoredMatch> {
        let total = self.docs.len() as u64;
        self.docs
            .iter()
            .enumerate()
            .filter(|(_, doc)| {
                query.terms().is_empty()
                    || doc.fields().any(|(_, value)| {
                        let value = value.to_lowercase();
                        query.terms().iter().any(|term| value.contains(term))
                    })
            })
            .map(|(i, _)| ScoredMatch::new(i as DocOrdinal, (total - i as u64) as f32))
            .collect()
    }
}

impl SnapshotReader for MemoryReader {
    fn search(&self, query: &Query, _sort: Option<&SortSpec>, limit: usize) -> io::Result<Page> {
        if self.fail_pages.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "index unreachable"));
        }
        let matched = self.matched(query);
        let total = matched.len() as u64;
        Ok(Page::new(matched.into_iter().take(limit).collect(), total))
    }

    fn search_after(
        &self,
        after: &ScoredMatch,
        query: &Query,
        _sort: Option<&SortSpec>,
        limit: usize,
    ) -> io::Result<Page> {
        if self.fail_pages.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "index unreachable"));
        }
        let matched = self.matched(query);
        let total = matched.len() as u64;
        let skip = matched
            .iter()
            .position(|hit| hit.doc == after.doc)
            .map(|p| p + 1)
            .unwrap_or(matched.len());
        Ok(Page::new(
            matched.into_iter().skip(skip).take(limit).collect(),
            total,
        ))
    }

    fn doc(&self, ordinal: DocOrdinal) -> io::Result<IndexedDocument> {
        if self.fail_docs.lock().unwrap().contains(&ordinal) {
            return Err(io::Error::new(io::ErrorKind::Other, "segment unreadable"));
        }
        self.docs
            .get(ordinal as usize)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such document"))
    }

    fn token_stream(&self, ordinal: DocOrdinal, field: &str) -> io::Result<Vec<Token>> {
        self.token_stream_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_token_field.lock().unwrap().as_deref() == Some(field) {
            return Err(io::Error::new(io::ErrorKind::Other, "term vector missing"));
        }
        let doc = self.doc(ordinal)?;
        Ok(doc
            .get(field)
            .map(tokenize_with_offsets)
            .unwrap_or_default())
    }
}

// ============================================================================
// MemoryEngine
// ============================================================================

/// Engine stub recording bookkeeping calls and snapshot releases
pub struct MemoryEngine {
    name: String,
    releases: AtomicUsize,
    added: Mutex<Vec<RecordId>>,
}

impl MemoryEngine {
    pub fn new(name: &str) -> Self {
        MemoryEngine {
            name: name.to_string(),
            releases: AtomicUsize::new(0),
            added: Mutex::new(Vec::new()),
        }
    }

    /// Number of release calls received
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Record identifiers passed to the bookkeeping hook, in call order
    pub fn added(&self) -> Vec<RecordId> {
        self.added.lock().unwrap().clone()
    }
}

impl IndexEngine for MemoryEngine {
    fn index_name(&self) -> &str {
        &self.name
    }

    fn on_record_added(&self, record: &RecordMatch, _hit: &ScoredMatch) {
        self.added.lock().unwrap().push(record.record_id);
    }

    fn release(&self, snapshot: &Snapshot) {
        self.releases.fetch_add(1, Ordering::SeqCst);
        snapshot.release();
    }
}

// ============================================================================
// TxnOracle
// ============================================================================

/// Oracle stub backed by explicit deleted/updated identifier sets
#[derive(Default)]
pub struct TxnOracle {
    deleted: HashSet<RecordId>,
    updated: HashSet<RecordId>,
}

impl TxnOracle {
    pub fn new() -> Self {
        TxnOracle::default()
    }

    pub fn with_deleted(mut self, id: RecordId) -> Self {
        self.deleted.insert(id);
        self
    }

    pub fn with_updated(mut self, id: RecordId) -> Self {
        self.updated.insert(id);
        self
    }
}

impl StalenessOracle for TxnOracle {
    fn is_deleted(&self, id: &RecordId) -> bool {
        self.deleted.contains(id)
    }

    fn is_updated_outside_txn(&self, id: &RecordId) -> bool {
        self.updated.contains(id)
    }
}

// ============================================================================
// RecordingMetrics
// ============================================================================

/// Metrics sink capturing every reported value
#[derive(Default)]
pub struct RecordingMetrics {
    lookups: Mutex<Vec<(String, Duration)>>,
    totals: Mutex<Vec<(String, u64)>>,
}

impl RecordingMetrics {
    pub fn new() -> Self {
        RecordingMetrics::default()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }

    pub fn totals(&self) -> Vec<(String, u64)> {
        self.totals.lock().unwrap().clone()
    }
}

impl MetricsSink for RecordingMetrics {
    fn record_lookup_latency(&self, index: &str, elapsed: Duration) {
        self.lookups.lock().unwrap().push((index.to_string(), elapsed));
    }

    fn record_total_hits(&self, index: &str, hits: u64) {
        self.totals.lock().unwrap().push((index.to_string(), hits));
    }
}
