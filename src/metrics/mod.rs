//! Latency tracking for benchmark runs.

mod histogram;

pub use histogram::LatencyHistogram;

use std::fmt;

/// Latency percentiles in microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencyPercentiles {
    pub count: u64,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub max: u64,
}

impl fmt::Display for LatencyPercentiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p50={}us p95={}us p99={}us max={}us",
            self.p50, self.p95, self.p99, self.max
        )
    }
}
