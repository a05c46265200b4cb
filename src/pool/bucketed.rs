//! Free-lists keyed by power-of-two capacity class.

use crossbeam::queue::SegQueue;

use super::buffer::{bucket_capacity, bucket_index, Buffer, NUM_BUCKETS};
use super::stats::{PoolCounters, PoolStats};
use super::{BufferPool, PoolConfig, PoolKind};

/// One lock-free free-list per capacity class `2^0 ..= 2^62`.
///
/// Every buffer this pool allocates has a power-of-two capacity, and a
/// released buffer is filed under the class of its capacity, so a
/// request is only ever served by a buffer of the matching class.
#[derive(Debug)]
pub struct BucketedPool {
    buckets: Vec<SegQueue<Buffer>>,
    start_capacity: usize,
    counters: PoolCounters,
}

impl BucketedPool {
    /// Create a pool with empty buckets.
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            buckets: (0..NUM_BUCKETS).map(|_| SegQueue::new()).collect(),
            start_capacity: config.start_capacity(),
            counters: PoolCounters::default(),
        }
    }

    /// Take a zeroed buffer of capacity `2^ceil(log2(n))` with length 0.
    fn take(&self, n: usize) -> Buffer {
        let index = bucket_index(n);
        let capacity = bucket_capacity(index);
        if let Some(mut buf) = self.buckets.get(index).and_then(SegQueue::pop) {
            if buf.capacity() == capacity {
                self.counters.hit();
                buf.scrub();
                return buf;
            }
            self.counters.dropped();
        }
        self.counters.miss();
        tracing::trace!(class = index, "bucketed pool allocating");
        Buffer::zeroed(capacity)
    }

    /// Number of buffers currently filed under each class.
    pub fn bucket_lens(&self) -> Vec<usize> {
        self.buckets.iter().map(SegQueue::len).collect()
    }
}

impl BufferPool for BucketedPool {
    fn kind(&self) -> PoolKind {
        PoolKind::Bucketed
    }

    #[inline]
    fn acquire(&self) -> Buffer {
        self.take(self.start_capacity)
    }

    fn release(&self, buf: Buffer) {
        // Only exact class sizes are filed; anything else would be handed
        // out under a class it does not fill.
        if !buf.capacity().is_power_of_two() {
            self.counters.dropped();
            return;
        }
        match self.buckets.get(bucket_index(buf.capacity())) {
            Some(bucket) => {
                self.counters.returned();
                bucket.push(buf);
            }
            None => self.counters.dropped(),
        }
    }

    fn resize(&self, mut buf: Buffer, new_len: usize) -> Buffer {
        if new_len <= buf.capacity() {
            buf.set_len(new_len);
            return buf;
        }
        self.counters.grow();
        let mut grown = self.take(new_len);
        grown.set_len(new_len);
        grown.as_mut_slice()[..buf.len()].copy_from_slice(buf.as_slice());
        self.release(buf);
        grown
    }

    fn stats(&self) -> PoolStats {
        let held = self.buckets.iter().map(SegQueue::len).sum();
        self.counters.snapshot(held)
    }
}
