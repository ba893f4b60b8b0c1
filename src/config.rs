//! Run configuration for window scoring and region merging.
//!
//! Every threshold used by the pipeline lives in [`EnrichConfig`], which is
//! built once at startup and shared read-only by all worker tasks.

use crate::scram::{Result, ScramError};

/// Default window size in bases.
pub const DEFAULT_WINDOW_SIZE: u64 = 100;
/// Default minimum number of qualifying sRNA records per window.
pub const DEFAULT_MIN_UNIQUE_SRNAS: usize = 5;
/// Default minimum per-replicate average abundance.
pub const DEFAULT_MIN_AVG_ABUNDANCE: f64 = 10.0;
/// Default multi-mapping cutoff.
pub const DEFAULT_MAX_TIMES_ALIGNED: u32 = 5;
/// Default largest gap bridged when merging windows.
pub const DEFAULT_MERGE_DISTANCE: u64 = 100;

/// Thresholds for the aggregation, filtering and merge stages.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichConfig {
    /// Width of each window in bases
    pub window_size: u64,
    /// Minimum number of qualifying records in a window
    pub min_unique_srnas: usize,
    /// Minimum average abundance, required of every replicate
    pub min_avg_abundance: f64,
    /// Records aligned more often than this are ignored
    pub max_times_aligned: u32,
    /// Largest gap between windows that still merges them
    pub merge_distance: u64,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EnrichConfig {
    pub fn new() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_unique_srnas: DEFAULT_MIN_UNIQUE_SRNAS,
            min_avg_abundance: DEFAULT_MIN_AVG_ABUNDANCE,
            max_times_aligned: DEFAULT_MAX_TIMES_ALIGNED,
            merge_distance: DEFAULT_MERGE_DISTANCE,
        }
    }

    pub fn with_window_size(mut self, size: u64) -> Self {
        self.window_size = size;
        self
    }

    pub fn with_min_unique_srnas(mut self, n: usize) -> Self {
        self.min_unique_srnas = n;
        self
    }

    pub fn with_min_avg_abundance(mut self, abundance: f64) -> Self {
        self.min_avg_abundance = abundance;
        self
    }

    pub fn with_max_times_aligned(mut self, n: u32) -> Self {
        self.max_times_aligned = n;
        self
    }

    pub fn with_merge_distance(mut self, d: u64) -> Self {
        self.merge_distance = d;
        self
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(ScramError::InvalidConfig(
                "window size must be greater than 0".to_string(),
            ));
        }
        if self.max_times_aligned == 0 {
            return Err(ScramError::InvalidConfig(
                "max times aligned must be greater than 0".to_string(),
            ));
        }
        if !self.min_avg_abundance.is_finite() || self.min_avg_abundance < 0.0 {
            return Err(ScramError::InvalidConfig(format!(
                "minimum average abundance must be a non-negative number, got {}",
                self.min_avg_abundance
            )));
        }
        Ok(())
    }
}
