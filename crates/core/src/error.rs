//! Error types for sift result sets
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::types::DocOrdinal;
use std::io;
use thiserror::Error;

/// Result type alias for sift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the result-set layer
#[derive(Debug, Error)]
pub enum Error {
    /// I/O failure reaching the index snapshot (page fetch, document fetch)
    ///
    /// Non-fatal by policy: paging code logs this and degrades to an empty
    /// page rather than propagating, so iteration ends early instead of
    /// failing. The variant exists for engine-facing conversions.
    #[error("index unavailable: {0}")]
    IndexUnavailable(#[from] io::Error),

    /// A matched document lacks the mandatory record identifier field
    ///
    /// Fatal integrity error: the index and the record layer have diverged.
    /// Always propagated.
    #[error("indexed document {doc} has a missing or invalid record identifier")]
    MalformedDocument {
        /// Index-internal ordinal of the offending document
        doc: DocOrdinal,
    },

    /// I/O or offset-mapping failure while generating highlight fragments
    ///
    /// Fatal for the current element: once highlighting is configured, a
    /// partially-highlighted match is not a degraded result. Propagated
    /// with the field name and cause chain.
    #[error("highlighting failed for field '{field}'")]
    HighlightFailure {
        /// Field being highlighted when the failure occurred
        field: String,
        /// Underlying cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Mutation or random access attempted on a read-only, forward-only view
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}
