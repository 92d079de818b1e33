//! Engine configuration.
//!
//! Built once at startup and never mutated afterwards. The engine only reads
//! these fields; there is no process-wide state.

use std::time::Duration;

/// Default advisory maximum computation time
pub const DEFAULT_MAX_COMPUTATION_TIME: Duration = Duration::from_secs(30);

/// Default base delay injected before every computation
pub const DEFAULT_SIMULATE_DELAY: Duration = Duration::from_secs(2);

/// Default ceiling for `matrix_size`
pub const DEFAULT_MAX_MATRIX_SIZE: usize = 2048;

/// Default number of matrix products allowed to run at once
pub const DEFAULT_MAX_CONCURRENT_MATRIX: usize = 4;

/// Immutable engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Reported by the status endpoint; never sensed
    pub gpu_available: bool,
    /// Advisory upper bound, reported but not enforced
    pub max_computation_time: Duration,
    /// Base delay applied to every `run`, regardless of kind
    pub simulate_delay: Duration,
    /// Largest accepted `matrix_size` (the product allocates N² floats three times)
    pub max_matrix_size: usize,
    /// Matrix products allowed in flight at once; further ones wait their turn
    pub max_concurrent_matrix: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gpu_available: true,
            max_computation_time: DEFAULT_MAX_COMPUTATION_TIME,
            simulate_delay: DEFAULT_SIMULATE_DELAY,
            max_matrix_size: DEFAULT_MAX_MATRIX_SIZE,
            max_concurrent_matrix: DEFAULT_MAX_CONCURRENT_MATRIX,
        }
    }
}

impl EngineConfig {
    /// Configuration with a different base delay (handy for tests and tools)
    pub fn with_simulate_delay(mut self, delay: Duration) -> Self {
        self.simulate_delay = delay;
        self
    }
}
