//! Monotonic id allocation

use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out increasing ids starting at 1
#[derive(Debug)]
pub struct IdSequence(AtomicI64);

impl IdSequence {
    pub const fn new() -> Self {
        Self(AtomicI64::new(1))
    }

    /// Allocate the next id
    pub fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }

    /// Make sure later allocations stay above an externally chosen id
    pub fn observe(&self, id: i64) {
        self.0.fetch_max(id + 1, Ordering::Relaxed);
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
