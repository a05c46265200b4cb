//! Lock-free histogram of encode-cycle latencies.
//!
//! Buckets are powers of two in microseconds: bucket `b` holds values
//! whose bit length is `b`, i.e. `[2^(b-1), 2^b)`, with bucket 0 for zero.

use std::sync::atomic::{AtomicU64, Ordering};

use super::LatencyPercentiles;

/// One bucket per possible bit length of a u64, plus zero.
const NUM_BUCKETS: usize = 65;

/// Latency histogram shared by all workers of a run.
pub struct LatencyHistogram {
    buckets: [AtomicU64; NUM_BUCKETS],
    count: AtomicU64,
    max: AtomicU64,
}

impl LatencyHistogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self {
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
            count: AtomicU64::new(0),
            max: AtomicU64::new(0),
        }
    }

    /// Record a latency in microseconds.
    #[inline]
    pub fn record(&self, value_us: u64) {
        self.buckets[Self::bucket(value_us)].fetch_add(1, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.max.fetch_max(value_us, Ordering::Relaxed);
    }

    #[inline]
    fn bucket(value_us: u64) -> usize {
        (u64::BITS - value_us.leading_zeros()) as usize
    }

    /// Largest value that falls in a bucket.
    #[inline]
    fn bucket_upper(bucket: usize) -> u64 {
        match bucket {
            0 => 0,
            64.. => u64::MAX,
            b => (1u64 << b) - 1,
        }
    }

    /// Number of recorded values.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Compute p50, p95, p99 as bucket upper bounds, capped at the max.
    pub fn percentiles(&self) -> LatencyPercentiles {
        let total = self.count();
        if total == 0 {
            return LatencyPercentiles::default();
        }
        let max = self.max.load(Ordering::Relaxed);

        let targets = [total.div_ceil(2), (total * 95).div_ceil(100), (total * 99).div_ceil(100)];
        let mut found = [None; 3];
        let mut cumulative = 0u64;
        for (bucket, count) in self.buckets.iter().enumerate() {
            cumulative += count.load(Ordering::Relaxed);
            for (slot, &target) in found.iter_mut().zip(&targets) {
                if slot.is_none() && cumulative >= target {
                    *slot = Some(Self::bucket_upper(bucket).min(max));
                }
            }
        }

        let [p50, p95, p99] = found.map(|v| v.unwrap_or(max));
        LatencyPercentiles {
            count: total,
            p50,
            p95,
            p99,
            max,
        }
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}
