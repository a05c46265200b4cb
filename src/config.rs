use clap::{Parser, ValueEnum};
use tracing::Level;

use crate::error::{Error, Result};
use crate::pool::{PoolConfig, PoolKind, DEFAULT_START_CAPACITY};
use crate::workload::{BenchOptions, DEFAULT_ITERATIONS, DEFAULT_SEED, DEFAULT_WORKERS};

/// slice-recycling - compare buffer recycling policies under concurrent encoding
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Recycling policy to benchmark
    #[arg(long, env = "POOLTYPE", value_enum, default_value = "null")]
    pub pool_type: PoolKind,

    /// Capacity of a freshly allocated buffer
    #[arg(long, env = "STARTCAP", default_value = "256")]
    pub start_cap: usize,

    /// Total encode cycles, split evenly across workers
    #[arg(long, default_value = "400000")]
    pub iterations: usize,

    /// Number of concurrent worker threads
    #[arg(short, long, default_value = "20")]
    pub workers: usize,

    /// Seed for the synthetic workload
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Check every cycle's output against a reference encoding
    #[arg(long)]
    pub verify: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Accepted log levels; anything else is rejected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl Config {
    /// Parse configuration from command line arguments and environment
    pub fn parse_args() -> Self {
        Config::parse()
    }

    /// Pool configuration, rejecting a zero start capacity
    pub fn pool_config(&self) -> Result<PoolConfig> {
        PoolConfig::new(self.start_cap)
    }

    /// Benchmark driver options
    pub fn bench_options(&self) -> Result<BenchOptions> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig("workers must be at least 1".to_string()));
        }
        Ok(BenchOptions {
            iterations: self.iterations,
            workers: self.workers,
            seed: self.seed,
            verify: self.verify,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pool_type: PoolKind::Null,
            start_cap: DEFAULT_START_CAPACITY,
            iterations: DEFAULT_ITERATIONS,
            workers: DEFAULT_WORKERS,
            seed: DEFAULT_SEED,
            verify: false,
            log_level: LogLevel::Info,
        }
    }
}
