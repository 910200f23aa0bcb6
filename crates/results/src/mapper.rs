//! Resolution of raw indexed documents into record matches
//!
//! The [`ResultMapper`] extracts the stable record identifier from the
//! reserved identifier field of a raw indexed document and captures the
//! contextual flags and field text the rest of the pipeline needs. The
//! identifier field is an engine-level contract invariant: every document
//! indexed for this layer carries it, so its absence is a fatal integrity
//! error, never a skip condition.
//!
//! Resolution is pure; the engine's per-result bookkeeping hook fires later,
//! at yield time, once the match has passed the skip decision.

use sift_core::types::{DocOrdinal, IndexedDocument, RecordId, RecordMatch, RECORD_ID_FIELD};
use sift_core::{Error, Result, StalenessOracle};

/// Maps raw indexed documents to resolved record matches
pub struct ResultMapper<'a> {
    oracle: &'a dyn StalenessOracle,
    highlight_fields: &'a [String],
}

impl<'a> ResultMapper<'a> {
    /// Create a mapper capturing the given highlight fields
    pub fn new(oracle: &'a dyn StalenessOracle, highlight_fields: &'a [String]) -> Self {
        ResultMapper {
            oracle,
            highlight_fields,
        }
    }

    /// Extract the record identifier from a document's reserved field
    ///
    /// Returns [`Error::MalformedDocument`] when the field is missing or
    /// unparsable.
    pub fn record_id(doc: &IndexedDocument, ordinal: DocOrdinal) -> Result<RecordId> {
        doc.get(RECORD_ID_FIELD)
            .and_then(|raw| raw.parse().ok())
            .ok_or(Error::MalformedDocument { doc: ordinal })
    }

    /// Resolve a document into a record match
    ///
    /// Captures the record identifier, the transaction-local provisional
    /// flag, and the raw text of the configured highlight fields (in
    /// configuration order, absent fields skipped).
    pub fn resolve(&self, doc: &IndexedDocument, ordinal: DocOrdinal) -> Result<RecordMatch> {
        let record_id = Self::record_id(doc, ordinal)?;
        let is_temporary = self.oracle.is_temporary_match(doc);
        let fields = self
            .highlight_fields
            .iter()
            .filter_map(|field| doc.get(field).map(|text| (field.clone(), text.to_string())))
            .collect();

        Ok(RecordMatch {
            record_id,
            is_temporary,
            fields,
        })
    }
}
