//! Buffer recycling pools.
//!
//! Every pool implements [`BufferPool`]. The five policies form a closed
//! set named by [`PoolKind`] and constructed through [`Pool::new`]:
//!
//! - `null`: no recycling, allocate and copy on grow
//! - `sync`: one shared lock-free free-list, old buffers recycled on grow
//! - `power2`: one free-list per power-of-two capacity class
//! - `reserved`: up to 20 buffers under one lock, with an adaptive target capacity
//! - `leakysync`: like `sync`, but buffers replaced by a grow are discarded

mod bucketed;
mod buffer;
mod central;
mod leaky;
mod null;
mod reserved;
mod stats;

pub use bucketed::BucketedPool;
pub use buffer::{bucket_capacity, bucket_index, grown_capacity, Buffer, NUM_BUCKETS};
pub use central::CentralPool;
pub use leaky::LeakyPool;
pub use null::NullPool;
pub use reserved::{ReservedPool, RESERVED_SLOTS};
pub use stats::PoolStats;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default capacity of a freshly allocated buffer.
pub const DEFAULT_START_CAPACITY: usize = 256;

/// Capability shared by all pools.
///
/// Buffers move by value: `release` and `resize` consume the handle they
/// are given, so a buffer has exactly one owner at any time. All methods
/// may be called concurrently from any number of threads.
pub trait BufferPool: Send + Sync {
    /// Which policy this pool implements.
    fn kind(&self) -> PoolKind;

    /// Get a buffer of length 0 whose storage is all zero.
    fn acquire(&self) -> Buffer;

    /// Give a buffer back. The pool may keep it or discard it.
    fn release(&self, buf: Buffer);

    /// Set the buffer's length to `new_len`, preserving the first
    /// `min(len, new_len)` bytes.
    ///
    /// Fits in the current capacity: only the length changes. Otherwise the
    /// content moves to new, zeroed storage, and what happens to the old
    /// storage depends on the policy.
    fn resize(&self, buf: Buffer, new_len: usize) -> Buffer;

    /// Snapshot of the pool's counters.
    fn stats(&self) -> PoolStats;
}

/// Configuration shared by every pool constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    start_capacity: usize,
}

impl PoolConfig {
    /// Create a config with the given starting capacity, which must be non-zero.
    pub fn new(start_capacity: usize) -> Result<Self> {
        if start_capacity == 0 {
            return Err(Error::InvalidConfig(
                "start capacity must be greater than zero".to_string(),
            ));
        }
        Ok(Self { start_capacity })
    }

    /// Capacity of a buffer allocated by `acquire` on an empty pool.
    #[inline]
    pub fn start_capacity(&self) -> usize {
        self.start_capacity
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            start_capacity: DEFAULT_START_CAPACITY,
        }
    }
}

/// The recycling policies, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum PoolKind {
    /// No recycling.
    #[value(name = "null")]
    Null,
    /// Shared free-list, recycles on release and grow.
    #[value(name = "sync")]
    Central,
    /// Free-lists per power-of-two capacity.
    #[value(name = "power2")]
    Bucketed,
    /// Fixed slots with adaptive target capacity.
    #[value(name = "reserved")]
    Reserved,
    /// Shared free-list, discards on grow.
    #[value(name = "leakysync")]
    Leaky,
}

impl PoolKind {
    /// Every policy, in reporting order.
    pub const ALL: [PoolKind; 5] = [
        PoolKind::Null,
        PoolKind::Central,
        PoolKind::Bucketed,
        PoolKind::Reserved,
        PoolKind::Leaky,
    ];

    /// The name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolKind::Null => "null",
            PoolKind::Central => "sync",
            PoolKind::Bucketed => "power2",
            PoolKind::Reserved => "reserved",
            PoolKind::Leaky => "leakysync",
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoolKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PoolKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownPool(s.to_string()))
    }
}

/// A pool of any kind, chosen at construction time.
#[derive(Debug)]
pub enum Pool {
    Null(NullPool),
    Central(CentralPool),
    Bucketed(BucketedPool),
    Reserved(ReservedPool),
    Leaky(LeakyPool),
}

impl Pool {
    /// Build the pool for `kind`.
    pub fn new(kind: PoolKind, config: &PoolConfig) -> Self {
        match kind {
            PoolKind::Null => Pool::Null(NullPool::new(config)),
            PoolKind::Central => Pool::Central(CentralPool::new(config)),
            PoolKind::Bucketed => Pool::Bucketed(BucketedPool::new(config)),
            PoolKind::Reserved => Pool::Reserved(ReservedPool::new(config)),
            PoolKind::Leaky => Pool::Leaky(LeakyPool::new(config)),
        }
    }
}

impl BufferPool for Pool {
    fn kind(&self) -> PoolKind {
        match self {
            Pool::Null(p) => p.kind(),
            Pool::Central(p) => p.kind(),
            Pool::Bucketed(p) => p.kind(),
            Pool::Reserved(p) => p.kind(),
            Pool::Leaky(p) => p.kind(),
        }
    }

    #[inline]
    fn acquire(&self) -> Buffer {
        match self {
            Pool::Null(p) => p.acquire(),
            Pool::Central(p) => p.acquire(),
            Pool::Bucketed(p) => p.acquire(),
            Pool::Reserved(p) => p.acquire(),
            Pool::Leaky(p) => p.acquire(),
        }
    }

    #[inline]
    fn release(&self, buf: Buffer) {
        match self {
            Pool::Null(p) => p.release(buf),
            Pool::Central(p) => p.release(buf),
            Pool::Bucketed(p) => p.release(buf),
            Pool::Reserved(p) => p.release(buf),
            Pool::Leaky(p) => p.release(buf),
        }
    }

    #[inline]
    fn resize(&self, buf: Buffer, new_len: usize) -> Buffer {
        match self {
            Pool::Null(p) => p.resize(buf, new_len),
            Pool::Central(p) => p.resize(buf, new_len),
            Pool::Bucketed(p) => p.resize(buf, new_len),
            Pool::Reserved(p) => p.resize(buf, new_len),
            Pool::Leaky(p) => p.resize(buf, new_len),
        }
    }

    fn stats(&self) -> PoolStats {
        match self {
            Pool::Null(p) => p.stats(),
            Pool::Central(p) => p.stats(),
            Pool::Bucketed(p) => p.stats(),
            Pool::Reserved(p) => p.stats(),
            Pool::Leaky(p) => p.stats(),
        }
    }
}
