//! Synthetic encode workload and the concurrent benchmark driver.
//!
//! Each worker repeatedly acquires an encoder from one shared pool,
//! appends a pseudo-random number of records and releases it. Record
//! counts and keys come from precomputed tables so the hot loop never
//! touches the RNG.

use std::thread;
use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::metrics::{LatencyHistogram, LatencyPercentiles};
use crate::pool::{BufferPool, PoolKind, PoolStats};
use crate::record::{encode_record, record_len, RecordEncoder};

/// Default workload seed.
pub const DEFAULT_SEED: u64 = 42;

/// Default total number of encode cycles.
pub const DEFAULT_ITERATIONS: usize = 400_000;

/// Default worker count. High enough to get churn in the pools.
pub const DEFAULT_WORKERS: usize = 20;

/// Shape of the generated tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadShape {
    /// Entries in the record-count table and in the key table.
    pub table_len: usize,
    /// Record counts are drawn from `[0, max_records)`.
    pub max_records: usize,
    /// Key lengths are drawn from `[0, max_key_len)`.
    pub max_key_len: usize,
}

impl Default for WorkloadShape {
    fn default() -> Self {
        Self {
            table_len: 10_000,
            max_records: 1000,
            max_key_len: 200,
        }
    }
}

/// Precomputed record counts and keys.
#[derive(Debug, Clone)]
pub struct Workload {
    sizes: Vec<usize>,
    keys: Vec<Bytes>,
}

impl Workload {
    /// Generate the default-shaped workload from `seed`.
    pub fn generate(seed: u64) -> Self {
        Self::with_shape(seed, WorkloadShape::default())
    }

    /// Generate a workload of the given shape. Keys are runs of `a`.
    pub fn with_shape(seed: u64, shape: WorkloadShape) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let sizes = (0..shape.table_len)
            .map(|_| rng.gen_range(0..shape.max_records.max(1)))
            .collect();
        let keys = (0..shape.table_len)
            .map(|_| Bytes::from(vec![b'a'; rng.gen_range(0..shape.max_key_len.max(1))]))
            .collect();
        Self { sizes, keys }
    }

    /// Record counts table.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Key table.
    pub fn keys(&self) -> &[Bytes] {
        &self.keys
    }

    /// Encode `count` records starting at key `first_key` into a plain
    /// buffer, bypassing every pool.
    pub fn reference(&self, first_key: usize, count: usize) -> BytesMut {
        let keys = self.keys.iter().cycle().skip(first_key).take(count);
        let mut out = BytesMut::with_capacity(keys.clone().map(|k| record_len(k)).sum());
        for key in keys {
            encode_record(&mut out, key, key.len() as i64);
        }
        out
    }
}

/// Driver parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchOptions {
    /// Total encode cycles across all workers.
    pub iterations: usize,
    /// Worker threads.
    pub workers: usize,
    /// Seeds each worker's starting table positions.
    pub seed: u64,
    /// Compare each cycle's output with [`Workload::reference`].
    pub verify: bool,
}

impl Default for BenchOptions {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            workers: DEFAULT_WORKERS,
            seed: DEFAULT_SEED,
            verify: false,
        }
    }
}

/// Outcome of a benchmark run.
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub kind: PoolKind,
    pub cycles: usize,
    pub records: usize,
    pub bytes: usize,
    pub elapsed: Duration,
    pub latency: LatencyPercentiles,
    pub pool: PoolStats,
}

impl BenchReport {
    /// Encode cycles per second.
    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.cycles as f64 / secs
        }
    }
}

/// Per-worker totals.
#[derive(Debug, Default)]
struct WorkerTotals {
    cycles: usize,
    records: usize,
    bytes: usize,
}

/// Run `options.iterations` encode cycles against `pool` on
/// `options.workers` threads.
pub fn run_bench<P: BufferPool>(
    pool: &P,
    workload: &Workload,
    options: &BenchOptions,
) -> Result<BenchReport> {
    if options.workers == 0 {
        return Err(Error::InvalidConfig("workers must be at least 1".to_string()));
    }
    if workload.sizes.is_empty() || workload.keys.is_empty() {
        return Err(Error::InvalidConfig("workload tables are empty".to_string()));
    }

    let per_worker = options.iterations / options.workers;
    let latency = LatencyHistogram::new();
    info!(
        "Running {} cycles on {} workers against pool '{}'",
        per_worker * options.workers,
        options.workers,
        pool.kind()
    );

    let start = Instant::now();
    let results: Vec<Result<WorkerTotals>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..options.workers)
            .map(|worker| {
                let latency = &latency;
                scope.spawn(move || {
                    run_worker(pool, workload, options, worker, per_worker, latency)
                })
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(worker, handle)| {
                handle
                    .join()
                    .unwrap_or(Err(Error::WorkerPanicked(worker)))
            })
            .collect()
    });
    let elapsed = start.elapsed();

    let mut totals = WorkerTotals::default();
    for result in results {
        let worker = result?;
        totals.cycles += worker.cycles;
        totals.records += worker.records;
        totals.bytes += worker.bytes;
    }

    Ok(BenchReport {
        kind: pool.kind(),
        cycles: totals.cycles,
        records: totals.records,
        bytes: totals.bytes,
        elapsed,
        latency: latency.percentiles(),
        pool: pool.stats(),
    })
}

fn run_worker<P: BufferPool>(
    pool: &P,
    workload: &Workload,
    options: &BenchOptions,
    worker: usize,
    cycles: usize,
    latency: &LatencyHistogram,
) -> Result<WorkerTotals> {
    let sizes = &workload.sizes;
    let keys = &workload.keys;

    // Random starting points so workers don't move through the tables in lockstep.
    let mut rng = StdRng::seed_from_u64(options.seed.wrapping_add(worker as u64));
    let mut size_idx = rng.gen_range(0..sizes.len());
    let mut key_idx = rng.gen_range(0..keys.len());

    let mut totals = WorkerTotals::default();
    for cycle in 0..cycles {
        let started = Instant::now();
        let first_key = key_idx;
        let count = sizes[size_idx];

        let mut enc = RecordEncoder::new(pool);
        for _ in 0..count {
            let key = &keys[key_idx];
            enc.append_record(key, key.len() as i64)?;
            key_idx = (key_idx + 1) % keys.len();
        }
        latency.record(started.elapsed().as_micros() as u64);

        if options.verify && enc.view() != &workload.reference(first_key, count)[..] {
            return Err(Error::Corruption { worker, cycle });
        }
        totals.bytes += enc.len();
        enc.release();

        totals.cycles += 1;
        totals.records += count;
        size_idx = (size_idx + 1) % sizes.len();
    }

    debug!(worker, cycles = totals.cycles, records = totals.records, "worker finished");
    Ok(totals)
}
