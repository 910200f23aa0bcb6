//! Read-only collection adapter
//!
//! Some call sites expect a general collection contract with membership
//! checks and mutation. The result set itself stays narrow (sized and
//! iterable only); [`RecordSet`] adapts it to the broader contract and
//! rejects every operation the underlying sequence cannot honor with
//! [`Error::Unsupported`], with no side effect. Membership checks would
//! force a full scan of a lazily paged sequence, so they are rejected too.

use crate::result_set::{LazyResultSet, ResultIter};
use sift_core::types::{RecordId, RecordMatch};
use sift_core::{Error, Result};

/// Collection facade over a [`LazyResultSet`]
pub struct RecordSet<'a> {
    results: &'a LazyResultSet<'a>,
}

impl<'a> RecordSet<'a> {
    /// Wrap a result set
    pub fn new(results: &'a LazyResultSet<'a>) -> Self {
        RecordSet { results }
    }

    /// Adjusted result count (see [`LazyResultSet::size`])
    pub fn len(&self) -> usize {
        self.results.size()
    }

    /// Whether the adjusted result count is zero
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Fresh forward-only iterator over the results
    pub fn iter(&self) -> ResultIter<'_> {
        self.results.iter()
    }

    /// Membership check; not supported on a lazy sequence
    pub fn contains(&self, _id: &RecordId) -> Result<bool> {
        Err(Error::Unsupported("contains on a lazy result set"))
    }

    /// Bulk membership check; not supported on a lazy sequence
    pub fn contains_all(&self, _ids: &[RecordId]) -> Result<bool> {
        Err(Error::Unsupported("containsAll on a lazy result set"))
    }

    /// Materialization; not supported on a lazy sequence
    pub fn to_vec(&self) -> Result<Vec<RecordMatch>> {
        Err(Error::Unsupported("toArray on a lazy result set"))
    }

    /// Insertion; result sets are read-only
    pub fn insert(&self, _record: RecordMatch) -> Result<bool> {
        Err(Error::Unsupported("add on a read-only result set"))
    }

    /// Removal; result sets are read-only
    pub fn remove(&self, _id: &RecordId) -> Result<bool> {
        Err(Error::Unsupported("remove on a read-only result set"))
    }

    /// Bulk removal; result sets are read-only
    pub fn remove_all(&self, _ids: &[RecordId]) -> Result<bool> {
        Err(Error::Unsupported("removeAll on a read-only result set"))
    }

    /// Bulk retention; result sets are read-only
    pub fn retain_all(&self, _ids: &[RecordId]) -> Result<bool> {
        Err(Error::Unsupported("retainAll on a read-only result set"))
    }

    /// Clearing; result sets are read-only
    pub fn clear(&self) -> Result<()> {
        Err(Error::Unsupported("clear on a read-only result set"))
    }
}
