//! Enrichment thresholds applied to aggregated windows.

use crate::commands::aggregate::{WindowMap, WindowStats};
use crate::interval::Window;

/// Unique-count and abundance cutoffs for a window.
#[derive(Debug, Clone)]
pub struct EnrichmentFilter {
    pub min_unique_srnas: usize,
    pub min_avg_abundance: f64,
}

impl EnrichmentFilter {
    pub fn new(min_unique_srnas: usize, min_avg_abundance: f64) -> Self {
        Self {
            min_unique_srnas,
            min_avg_abundance,
        }
    }

    /// A window is enriched when it holds enough records and every replicate
    /// averages at least the abundance cutoff. With no replicate columns the
    /// abundance test passes.
    #[inline]
    pub fn is_enriched(&self, stats: &WindowStats) -> bool {
        stats.unique_count >= self.min_unique_srnas
            && stats.averages().all(|avg| avg >= self.min_avg_abundance)
    }

    /// Windows of one reference that pass, in no particular order.
    pub fn filter(&self, windows: &WindowMap) -> Vec<Window> {
        windows
            .iter()
            .filter(|(_, stats)| self.is_enriched(stats))
            .map(|(window, _)| *window)
            .collect()
    }
}
