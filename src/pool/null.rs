//! Baseline pool that never recycles.

use super::buffer::{grown_capacity, Buffer};
use super::stats::{PoolCounters, PoolStats};
use super::{BufferPool, PoolConfig, PoolKind};

/// Allocates on every acquire and discards everything it is given back.
#[derive(Debug)]
pub struct NullPool {
    start_capacity: usize,
    counters: PoolCounters,
}

impl NullPool {
    /// Create a null pool handing out buffers of the configured capacity.
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            start_capacity: config.start_capacity(),
            counters: PoolCounters::default(),
        }
    }
}

impl BufferPool for NullPool {
    fn kind(&self) -> PoolKind {
        PoolKind::Null
    }

    #[inline]
    fn acquire(&self) -> Buffer {
        self.counters.miss();
        Buffer::zeroed(self.start_capacity)
    }

    #[inline]
    fn release(&self, _buf: Buffer) {
        self.counters.dropped();
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
        self.counters.snapshot(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> NullPool {
        NullPool::new(&PoolConfig::default())
    }

    #[test]
    fn test_acquire_allocates_every_time() {
        let pool = pool();
        let buf = pool.acquire();
        assert_eq!(buf.capacity(), 256);
        pool.release(buf);
        let _ = pool.acquire();

        let stats = pool.stats();
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.held, 0);
    }

    #[test]
    fn test_resize_in_place() {
        let pool = pool();
        let buf = pool.resize(pool.acquire(), 256);
        assert_eq!(buf.len(), 256);
        assert_eq!(buf.capacity(), 256);
        assert_eq!(pool.stats().grows, 0);
    }

    #[test]
    fn test_resize_doubles() {
        let pool = pool();
        let mut buf = pool.resize(pool.acquire(), 4);
        buf.as_mut_slice().copy_from_slice(b"keep");

        let buf = pool.resize(buf, 257);
        assert_eq!(buf.capacity(), 512);
        assert_eq!(&buf.as_slice()[..4], b"keep");
        assert!(buf.as_slice()[4..].iter().all(|&b| b == 0));

        let stats = pool.stats();
        assert_eq!(stats.grows, 1);
        assert_eq!(stats.drops, 1);
    }
}
