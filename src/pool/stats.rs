//! Per-pool recycling counters.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Relaxed ordering is enough; counters are only read for reporting.
const RELAXED: Ordering = Ordering::Relaxed;

/// Lock-free counters shared by every pool variant.
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    /// Acquires served from free storage.
    hits: AtomicUsize,
    /// Acquires that allocated fresh storage.
    misses: AtomicUsize,
    /// Resizes that needed more capacity.
    grows: AtomicUsize,
    /// Buffers accepted into free storage.
    returns: AtomicUsize,
    /// Buffers discarded instead of stored.
    drops: AtomicUsize,
}

impl PoolCounters {
    #[inline]
    pub fn hit(&self) {
        self.hits.fetch_add(1, RELAXED);
    }

    #[inline]
    pub fn miss(&self) {
        self.misses.fetch_add(1, RELAXED);
    }

    #[inline]
    pub fn grow(&self) {
        self.grows.fetch_add(1, RELAXED);
    }

    #[inline]
    pub fn returned(&self) {
        self.returns.fetch_add(1, RELAXED);
    }

    #[inline]
    pub fn dropped(&self) {
        self.drops.fetch_add(1, RELAXED);
    }

    /// Snapshot the counters together with the number of buffers held.
    pub fn snapshot(&self, held: usize) -> PoolStats {
        PoolStats {
            held,
            hits: self.hits.load(RELAXED),
            misses: self.misses.load(RELAXED),
            grows: self.grows.load(RELAXED),
            returns: self.returns.load(RELAXED),
            drops: self.drops.load(RELAXED),
        }
    }
}

/// Pool statistics for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Buffers currently in free storage.
    pub held: usize,
    /// Buffers acquired from free storage.
    pub hits: usize,
    /// Buffers allocated on acquire because free storage was empty.
    pub misses: usize,
    /// Resizes that reallocated.
    pub grows: usize,
    /// Buffers returned to free storage.
    pub returns: usize,
    /// Buffers discarded.
    pub drops: usize,
}

impl PoolStats {
    /// Fraction of acquires served by reuse (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
