//! Unique identifiers for generated cells.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A monotonically increasing identifier source.
///
/// Every grating coupler draws one identifier, so two couplers never share a cell name
/// even when their parameters and coordinates coincide. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct NameSeq {
    next: Arc<AtomicU64>,
}

impl NameSeq {
    /// Creates a sequence starting at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sequence whose first identifier is `start`.
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Returns the next identifier, advancing the sequence.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the identifier the next call to [`NameSeq::next_id`] will hand out.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}
