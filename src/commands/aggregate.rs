//! Window aggregation: bin one reference's records into fixed-size windows.

use crate::interval::Window;
use crate::record::AlignmentRecord;
use rustc_hash::FxHashMap;

/// Per-window accumulator.
///
/// `unique_count` counts qualifying records, not distinct sequences: the same
/// sRNA listed twice counts twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowStats {
    pub unique_count: usize,
    pub abundance_totals: Vec<f64>,
}

impl WindowStats {
    /// Fold one record into the accumulator.
    #[inline]
    pub fn add(&mut self, abundances: &[f64]) {
        if self.abundance_totals.len() < abundances.len() {
            self.abundance_totals.resize(abundances.len(), 0.0);
        }
        for (total, value) in self.abundance_totals.iter_mut().zip(abundances) {
            *total += value;
        }
        self.unique_count += 1;
    }

    /// Per-replicate average abundance over the records in this window.
    pub fn averages(&self) -> impl Iterator<Item = f64> + '_ {
        let n = self.unique_count.max(1) as f64;
        self.abundance_totals.iter().map(move |total| total / n)
    }

    /// Number of replicate columns seen.
    #[inline]
    pub fn replicates(&self) -> usize {
        self.abundance_totals.len()
    }
}

/// Window statistics for a single reference sequence.
pub type WindowMap = FxHashMap<Window, WindowStats>;

/// Bins records into windows and sums their statistics.
#[derive(Debug, Clone)]
pub struct WindowAggregator {
    /// Width of each window (must be non-zero)
    pub window_size: u64,
    /// Records aligned more often than this are skipped
    pub max_times_aligned: u32,
}

impl WindowAggregator {
    pub fn new(window_size: u64, max_times_aligned: u32) -> Self {
        Self {
            window_size,
            max_times_aligned,
        }
    }

    /// True if the record passes the multi-mapping cutoff.
    #[inline]
    pub fn qualifies(&self, record: &AlignmentRecord) -> bool {
        record.times_aligned <= self.max_times_aligned
    }

    /// Aggregate the records of one reference sequence.
    ///
    /// Only windows holding at least one qualifying record are returned.
    pub fn aggregate(&self, records: &[AlignmentRecord]) -> WindowMap {
        let mut windows = WindowMap::default();

        for record in records.iter().filter(|r| self.qualifies(r)) {
            let window = Window::containing(record.position, self.window_size);
            windows
                .entry(window)
                .or_default()
                .add(&record.abundances);
        }

        windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(position: u64, times_aligned: u32, abundances: &[f64]) -> AlignmentRecord {
        AlignmentRecord::new("chr1", position, times_aligned, abundances.to_vec())
    }

    #[test]
    fn test_bins_by_window() {
        let agg = WindowAggregator::new(100, 5);
        let windows = agg.aggregate(&[
            rec(10, 1, &[6.0]),
            rec(20, 1, &[4.0]),
            rec(150, 1, &[6.0]),
        ]);

        assert_eq!(windows.len(), 2);
        let first = &windows[&Window { start: 0, end: 100 }];
        assert_eq!(first.unique_count, 2);
        assert_eq!(first.abundance_totals, vec![10.0]);
        let second = &windows[&Window { start: 100, end: 200 }];
        assert_eq!(second.unique_count, 1);
    }

    #[test]
    fn test_multimapped_excluded() {
        let agg = WindowAggregator::new(100, 5);
        let windows = agg.aggregate(&[rec(10, 6, &[100.0]), rec(250, 5, &[1.0])]);

        assert_eq!(windows.len(), 1);
        assert!(!windows.contains_key(&Window { start: 0, end: 100 }));
        assert_eq!(windows[&Window { start: 200, end: 300 }].unique_count, 1);
    }

    #[test]
    fn test_duplicates_count_twice() {
        let agg = WindowAggregator::new(50, 5);
        let a = rec(10, 1, &[1.0, 2.0]).with_sequence("ACGT");
        let windows = agg.aggregate(&[a.clone(), a]);

        let stats = &windows[&Window { start: 0, end: 50 }];
        assert_eq!(stats.unique_count, 2);
        assert_eq!(stats.abundance_totals, vec![2.0, 4.0]);
        let avgs: Vec<f64> = stats.averages().collect();
        assert_eq!(avgs, vec![1.0, 2.0]);
    }

    #[test]
    fn test_empty_input() {
        let agg = WindowAggregator::new(100, 5);
        assert!(agg.aggregate(&[]).is_empty());
    }

    #[test]
    fn test_uneven_replicates_grow_totals() {
        let mut stats = WindowStats::default();
        stats.add(&[1.0]);
        stats.add(&[1.0, 4.0]);
        assert_eq!(stats.abundance_totals, vec![2.0, 4.0]);
        assert_eq!(stats.replicates(), 2);
    }
}
