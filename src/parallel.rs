//! Thread pool configuration for elementwise conversions
//!
//! Array conversions in [`crate::thermo`] run on Rayon's global pool; this
//! module lets the binary size that pool once at startup.

use crate::errors::{Result, WrfError};
use rayon::ThreadPoolBuilder;
use tracing::info;

/// Configuration for parallel processing
#[derive(Debug, Clone, Default)]
pub struct ParallelConfig {
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    pub fn new(num_threads: Option<usize>) -> Self {
        Self { num_threads }
    }

    /// Use every available CPU core
    pub fn all_cores() -> Self {
        Self {
            num_threads: Some(num_cpus::get()),
        }
    }

    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }

    /// Set up the global Rayon thread pool.
    ///
    /// Leaves Rayon's default pool in place when no thread count is set. The
    /// global pool can only be built once per process.
    pub fn setup_global_pool(&self) -> Result<()> {
        if let Some(num_threads) = self.num_threads {
            ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()
                .map_err(|e| {
                    WrfError::ThreadPool(format!(
                        "Failed to initialize thread pool with {} threads: {}",
                        num_threads, e
                    ))
                })?;
            info!(num_threads, "configured thread pool");
        }
        Ok(())
    }

    pub fn current_threads(&self) -> usize {
        rayon::current_num_threads()
    }
}
