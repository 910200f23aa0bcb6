//! Core value types for sift result sets
//!
//! This module defines the foundational types flowing between the index
//! engine, the transaction layer and the result-set core:
//! - Query: compiled, immutable search predicate
//! - ScoredMatch / Page: one ranked hit and one fetched page
//! - IndexedDocument: stored fields of one raw indexed document
//! - RecordId / RecordMatch: resolved record identity
//! - Token / TextFragment: highlighting inputs and outputs
//!
//! These types define the interface contracts between the collaborators;
//! the engine-side implementations live behind the traits in [`crate::traits`].

use crate::tokenizer::tokenize_unique;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Index-internal document number, only meaningful within one snapshot
pub type DocOrdinal = u64;

/// Sort key values captured on a hit for search-after continuation
pub type SortKey = Vec<String>;

/// Reserved stored field carrying the record identifier
///
/// Every document indexed for this result-set layer carries this field;
/// its absence is an integrity error, not a skip condition.
pub const RECORD_ID_FIELD: &str = "_rid";

/// Reserved marker field written by the transaction layer into
/// transaction-local provisional documents
///
/// Presence of the field (any value) marks a temporary match.
pub const TMP_MATCH_FIELD: &str = "_tmp";

// ============================================================================
// RecordId
// ============================================================================

/// Stable identifier of one record in the record layer
///
/// Displayed and stored as `partition:position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId {
    /// Partition (cluster) the record lives in
    pub partition: u32,
    /// Position within the partition
    pub position: u64,
}

impl RecordId {
    /// Create a new RecordId
    pub fn new(partition: u32, position: u64) -> Self {
        RecordId {
            partition,
            position,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.partition, self.position)
    }
}

impl FromStr for RecordId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (partition, position) = s.split_once(':').ok_or(())?;
        Ok(RecordId {
            partition: partition.parse().map_err(|_| ())?,
            position: position.parse().map_err(|_| ())?,
        })
    }
}

// ============================================================================
// Query
// ============================================================================

#[derive(Debug)]
struct QueryInner {
    expression: String,
    terms: Vec<String>,
}

/// Compiled, immutable search predicate
///
/// Compilation tokenizes the expression once; the deduplicated term list
/// drives highlighting and engine-side matching. The inner state is shared,
/// so clones are cheap and identity is by allocation.
///
/// # Example
///
/// ```
/// use sift_core::types::Query;
///
/// let query = Query::compile("Hello, World!");
/// assert_eq!(query.terms(), ["hello", "world"]);
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    inner: Arc<QueryInner>,
}

impl Query {
    /// Compile an expression into an immutable query
    pub fn compile(expression: impl Into<String>) -> Self {
        let expression = expression.into();
        let terms = tokenize_unique(&expression);
        Query {
            inner: Arc::new(QueryInner { expression, terms }),
        }
    }

    /// The raw query expression
    pub fn expression(&self) -> &str {
        &self.inner.expression
    }

    /// Deduplicated search terms, in first-occurrence order
    pub fn terms(&self) -> &[String] {
        &self.inner.terms
    }

    /// Whether two handles refer to the same compiled query
    pub fn same_query(&self, other: &Query) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

// ============================================================================
// SortSpec
// ============================================================================

/// One field of a sort directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Field to order by
    pub field: String,
    /// Descending order when true
    pub descending: bool,
}

/// Ordering directive for a query
///
/// Absence of a SortSpec means natural relevance-score order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Ordered sort fields, most significant first
    pub fields: Vec<SortField>,
}

impl SortSpec {
    /// Create an empty sort spec
    pub fn new() -> Self {
        SortSpec::default()
    }

    /// Builder: append a sort field
    pub fn by_field(mut self, field: impl Into<String>, descending: bool) -> Self {
        self.fields.push(SortField {
            field: field.into(),
            descending,
        });
        self
    }
}

// ============================================================================
// ScoredMatch / Page
// ============================================================================

/// One ranked hit as produced by the index engine
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    /// Index-internal document ordinal
    pub doc: DocOrdinal,
    /// Relevance score (higher = more relevant)
    pub score: f32,
    /// Sort key values when a sort spec is in effect
    pub sort_key: Option<SortKey>,
}

impl ScoredMatch {
    /// Create a new match with no sort key
    pub fn new(doc: DocOrdinal, score: f32) -> Self {
        ScoredMatch {
            doc,
            score,
            sort_key: None,
        }
    }

    /// Builder: set the sort key
    pub fn with_sort_key(mut self, sort_key: SortKey) -> Self {
        self.sort_key = Some(sort_key);
        self
    }
}

/// One fetched page of ranked matches
///
/// Order within a page is fixed by the sort spec (or relevance) and is
/// never re-sorted by the consumer. The last entry is the continuation
/// cursor for search-after paging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Matches in engine order
    pub matches: Vec<ScoredMatch>,
    /// Engine-reported raw total hit count for the query
    pub total_hits: u64,
}

impl Page {
    /// Create a page from matches and the raw total
    pub fn new(matches: Vec<ScoredMatch>, total_hits: u64) -> Self {
        Page {
            matches,
            total_hits,
        }
    }

    /// An empty page (used when a fetch degrades on I/O failure)
    pub fn empty() -> Self {
        Page::default()
    }

    /// Continuation cursor: the last match of this page
    pub fn last(&self) -> Option<&ScoredMatch> {
        self.matches.last()
    }

    /// Number of matches in this page
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Check if the page holds no matches
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

// ============================================================================
// IndexedDocument
// ============================================================================

/// Stored fields of one raw indexed document
///
/// The engine returns one of these per document ordinal. Reserved fields:
/// [`RECORD_ID_FIELD`] (mandatory) and [`TMP_MATCH_FIELD`] (present only on
/// transaction-local provisional entries).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    fields: HashMap<String, String>,
}

impl IndexedDocument {
    /// Create an empty document
    pub fn new() -> Self {
        IndexedDocument::default()
    }

    /// Builder: set a stored field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a stored field's text
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Whether a stored field is present
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterate over all stored fields
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ============================================================================
// RecordMatch
// ============================================================================

/// One resolved result element
///
/// Carries the stable record identifier, the transaction-local provisional
/// flag, and the raw text of the configured highlight fields (captured at
/// resolution so fragment generation needs no second document fetch).
#[derive(Debug, Clone, PartialEq)]
pub struct RecordMatch {
    /// Resolved record identifier
    pub record_id: RecordId,
    /// True if the source document is a transaction-local provisional entry
    pub is_temporary: bool,
    /// Raw text of the configured highlight fields, in configuration order
    pub fields: Vec<(String, String)>,
}

impl RecordMatch {
    /// Captured raw text for one highlight field
    pub fn field_text(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, text)| text.as_str())
    }
}

// ============================================================================
// Token / TextFragment
// ============================================================================

/// One token of a field's token stream
///
/// `start`/`end` are byte offsets into the original field text; `text` is
/// the lowercased token for term matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Lowercased token text
    pub text: String,
    /// Byte offset of the token start in the field text
    pub start: usize,
    /// Byte offset one past the token end
    pub end: usize,
}

/// A bounded excerpt of field text with match terms marked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Fragment text with markers inserted around matched terms
    pub text: String,
    /// Fragment score (number of matched terms)
    pub score: f32,
}

impl TextFragment {
    /// Create a new fragment
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        TextFragment {
            text: text.into(),
            score,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
