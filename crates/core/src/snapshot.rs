//! Reference-counted handle to an immutable index snapshot
//!
//! A snapshot is a point-in-time view of the index used for one query's
//! lifetime. Multiple readers may hold it concurrently; each holder tracks
//! its interest through an explicit count so release stays deterministic
//! (an explicit call at the end of the pull loop, never a finalizer).
//!
//! # Shared-resource policy
//!
//! The result-set iterator releases its hold on natural exhaustion only if
//! the snapshot is still shared (`ref_count() > 1` at that moment). A sole
//! holder leaves release to its owning scope. Early abandonment of an
//! iterator is not covered; callers needing deterministic cleanup must
//! scope the snapshot acquisition at a higher layer.

use crate::traits::SnapshotReader;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Handle to an immutable, reference-counted index snapshot
pub struct Snapshot {
    reader: Arc<dyn SnapshotReader>,
    holds: Arc<AtomicUsize>,
}

impl Snapshot {
    /// Wrap an engine reader into a snapshot handle with one hold
    pub fn new(reader: Arc<dyn SnapshotReader>) -> Self {
        Snapshot {
            reader,
            holds: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Access the underlying reader
    pub fn reader(&self) -> &dyn SnapshotReader {
        self.reader.as_ref()
    }

    /// Take an additional hold on the snapshot
    ///
    /// The returned handle shares the same reader and count.
    pub fn acquire(&self) -> Snapshot {
        self.holds.fetch_add(1, Ordering::AcqRel);
        Snapshot {
            reader: Arc::clone(&self.reader),
            holds: Arc::clone(&self.holds),
        }
    }

    /// Drop one hold on the snapshot
    ///
    /// Releasing below zero is a no-op; the count never underflows.
    pub fn release(&self) {
        let _ = self
            .holds
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    /// Current number of holds
    pub fn ref_count(&self) -> usize {
        self.holds.load(Ordering::Acquire)
    }

    /// Whether more than one holder currently references the snapshot
    pub fn is_shared(&self) -> bool {
        self.ref_count() > 1
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("ref_count", &self.ref_count())
            .finish()
    }
}
