//! Buffer recycling policies for encoders that repeatedly build
//! variable-length byte buffers under concurrent load.
//!
//! A [`pool::Pool`] hands out move-only [`pool::Buffer`]s; a
//! [`record::RecordEncoder`] borrows a pool, grows its buffer one record
//! at a time through the pool's `resize`, and gives it back on release.

pub mod config;
pub mod error;
pub mod metrics;
pub mod pool;
pub mod record;
pub mod workload;

pub use config::Config;
pub use error::{Error, Result};
pub use pool::{Buffer, BufferPool, Pool, PoolConfig, PoolKind};
pub use record::RecordEncoder;
