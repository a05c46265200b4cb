//! Central free-list that loses every buffer replaced by a grow.

use crossbeam::queue::SegQueue;

use super::buffer::{grown_capacity, Buffer};
use super::central::CentralPool;
use super::stats::{PoolCounters, PoolStats};
use super::{BufferPool, PoolConfig, PoolKind};

/// Same acquire and release as [`CentralPool`], but a growing resize
/// discards the old buffer. Only what an encoder holds at release time
/// re-enters the pool.
#[derive(Debug)]
pub struct LeakyPool {
    free: SegQueue<Buffer>,
    start_capacity: usize,
    counters: PoolCounters,
}

impl LeakyPool {
    /// Create an empty leaky pool.
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            free: SegQueue::new(),
            start_capacity: config.start_capacity(),
            counters: PoolCounters::default(),
        }
    }
}

impl BufferPool for LeakyPool {
    fn kind(&self) -> PoolKind {
        PoolKind::Leaky
    }

    #[inline]
    fn acquire(&self) -> Buffer {
        CentralPool::take(&self.free, self.start_capacity, &self.counters)
    }

    #[inline]
    fn release(&self, buf: Buffer) {
        self.counters.returned();
        self.free.push(buf);
    }

    fn resize(&self, mut buf: Buffer, new_len: usize) -> Buffer {
        if new_len <= buf.capacity() {
            buf.set_len(new_len);
            return buf;
        }
        self.counters.grow();
        self.counters.dropped();
        Buffer::grown_from(&buf, new_len, grown_capacity(buf.capacity(), new_len))
    }

    fn stats(&self) -> PoolStats {
        self.counters.snapshot(self.free.len())
    }
}
