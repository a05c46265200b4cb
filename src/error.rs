use std::fmt;

/// Unified error type for pool, encoder and benchmark operations
#[derive(Debug)]
pub enum Error {
    /// Pool name not one of the known policies
    UnknownPool(String),

    /// Configuration value out of range
    InvalidConfig(String),

    /// Record key contains the zero byte used as its terminator
    KeyContainsNul,

    /// Encoded bytes end in the middle of a record
    Truncated { offset: usize },

    /// A worker's encoded bytes differ from the reference encoding
    Corruption { worker: usize, cycle: usize },

    /// A benchmark worker thread panicked
    WorkerPanicked(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownPool(name) => write!(
                f,
                "Unrecognized pool type '{}' (expected one of null, sync, power2, reserved, leakysync)",
                name
            ),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::KeyContainsNul => write!(f, "Record key contains a zero byte"),
            Error::Truncated { offset } => write!(f, "Truncated record at offset {}", offset),
            Error::Corruption { worker, cycle } => write!(
                f,
                "Worker {} produced corrupted output in cycle {}",
                worker, cycle
            ),
            Error::WorkerPanicked(worker) => write!(f, "Worker {} panicked", worker),
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias for recycling operations
pub type Result<T> = std::result::Result<T, Error>;
