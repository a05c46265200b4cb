//! Single shared free-list, recycling on both release and grow.

use crossbeam::queue::SegQueue;

use super::buffer::{grown_capacity, Buffer};
use super::stats::{PoolCounters, PoolStats};
use super::{BufferPool, PoolConfig, PoolKind};

/// Lock-free free-list of buffers shared by every encoder.
///
/// Popped buffers are zeroed over their full capacity before they are
/// handed out. Buffers replaced by a grow go straight back on the list.
#[derive(Debug)]
pub struct CentralPool {
    free: SegQueue<Buffer>,
    start_capacity: usize,
    counters: PoolCounters,
}

impl CentralPool {
    /// Create an empty central pool.
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            free: SegQueue::new(),
            start_capacity: config.start_capacity(),
            counters: PoolCounters::default(),
        }
    }

    /// Pop and scrub a recycled buffer, or allocate a fresh one.
    ///
    /// Shared with the leaky pool, whose acquire path is identical.
    #[inline]
    pub(crate) fn take(
        free: &SegQueue<Buffer>,
        start_capacity: usize,
        counters: &PoolCounters,
    ) -> Buffer {
        match free.pop() {
            Some(mut buf) => {
                counters.hit();
                buf.scrub();
                buf
            }
            None => {
                counters.miss();
                Buffer::zeroed(start_capacity)
            }
        }
    }
}

impl BufferPool for CentralPool {
    fn kind(&self) -> PoolKind {
        PoolKind::Central
    }

    #[inline]
    fn acquire(&self) -> Buffer {
        Self::take(&self.free, self.start_capacity, &self.counters)
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
        let grown = Buffer::grown_from(&buf, new_len, grown_capacity(buf.capacity(), new_len));
        self.release(buf);
        grown
    }

    fn stats(&self) -> PoolStats {
        self.counters.snapshot(self.free.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> CentralPool {
        CentralPool::new(&PoolConfig::default())
    }

    #[test]
    fn test_reuse_scrubs_content() {
        let pool = pool();
        let mut buf = pool.resize(pool.acquire(), 5);
        buf.as_mut_slice().copy_from_slice(b"stale");
        pool.release(buf);

        let buf = pool.acquire();
        assert_eq!(buf.len(), 0);
        assert!(buf.storage().iter().all(|&b| b == 0));

        let stats = pool.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_grow_recycles_old_buffer() {
        let pool = pool();
        let buf = pool.acquire();
        let buf = pool.resize(buf, 300);
        assert_eq!(buf.capacity(), 512);

        let stats = pool.stats();
        assert_eq!(stats.grows, 1);
        assert_eq!(stats.returns, 1);
        assert_eq!(stats.held, 1);

        // The replaced buffer is the next one handed out.
        let recycled = pool.acquire();
        assert_eq!(recycled.capacity(), 256);
        assert_eq!(buf.len(), 300);
    }

    #[test]
    fn test_release_is_unconditional() {
        let pool = pool();
        let bufs: Vec<_> = (0..50).map(|_| pool.acquire()).collect();
        for buf in bufs {
            pool.release(buf);
        }
        assert_eq!(pool.stats().held, 50);
    }
}
