//! Small fixed set of reserved buffers behind one lock.

use parking_lot::Mutex;

use super::buffer::{grown_capacity, Buffer};
use super::stats::{PoolCounters, PoolStats};
use super::{BufferPool, PoolConfig, PoolKind};

/// Number of slots in a reserved pool.
pub const RESERVED_SLOTS: usize = 20;

/// Slot array and target capacity, guarded together.
#[derive(Debug)]
struct Slots {
    /// Stored buffers; never grows past `RESERVED_SLOTS`.
    bufs: Vec<Buffer>,
    /// Minimum capacity a released buffer needs to be kept. Only grows.
    target_capacity: usize,
}

/// Keeps at most [`RESERVED_SLOTS`] buffers and adapts the size of new
/// buffers to the largest recent demand.
///
/// A growing resize raises the target capacity and allocates at the new
/// target. The replaced buffer is not returned to the slots.
#[derive(Debug)]
pub struct ReservedPool {
    slots: Mutex<Slots>,
    counters: PoolCounters,
}

impl ReservedPool {
    /// Create a reserved pool whose target capacity starts at the
    /// configured start capacity.
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            slots: Mutex::new(Slots {
                bufs: Vec::with_capacity(RESERVED_SLOTS),
                target_capacity: config.start_capacity(),
            }),
            counters: PoolCounters::default(),
        }
    }

    /// Current target capacity.
    pub fn target_capacity(&self) -> usize {
        self.slots.lock().target_capacity
    }
}

impl BufferPool for ReservedPool {
    fn kind(&self) -> PoolKind {
        PoolKind::Reserved
    }

    fn acquire(&self) -> Buffer {
        let popped = {
            let mut slots = self.slots.lock();
            slots.bufs.pop().ok_or(slots.target_capacity)
        };
        match popped {
            Ok(mut buf) => {
                self.counters.hit();
                buf.scrub();
                buf
            }
            Err(capacity) => {
                self.counters.miss();
                Buffer::zeroed(capacity)
            }
        }
    }

    fn release(&self, buf: Buffer) {
        let rejected = {
            let mut slots = self.slots.lock();
            if buf.capacity() < slots.target_capacity || slots.bufs.len() == RESERVED_SLOTS {
                Some(buf)
            } else {
                slots.bufs.push(buf);
                None
            }
        };
        match rejected {
            Some(_) => self.counters.dropped(),
            None => self.counters.returned(),
        }
    }

    fn resize(&self, mut buf: Buffer, new_len: usize) -> Buffer {
        if new_len <= buf.capacity() {
            buf.set_len(new_len);
            return buf;
        }
        let capacity = {
            let mut slots = self.slots.lock();
            slots.target_capacity = grown_capacity(slots.target_capacity, new_len);
            slots.target_capacity
        };
        tracing::debug!(target_capacity = capacity, "reserved pool target raised");
        self.counters.grow();
        self.counters.dropped();
        Buffer::grown_from(&buf, new_len, capacity)
    }

    fn stats(&self) -> PoolStats {
        let held = self.slots.lock().bufs.len();
        self.counters.snapshot(held)
    }
}
