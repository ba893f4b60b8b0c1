//! Region merging for enriched windows.
//!
//! Uses O(n log n) sort + O(n) single-pass sweep-line merge.

use crate::interval::{MergedRegion, Window};
use std::collections::BTreeMap;

/// Merged regions for every reference, keyed by reference id.
pub type RegionMap = BTreeMap<String, Vec<MergedRegion>>;

/// Coalesces the enriched windows of one reference into regions.
#[derive(Debug, Clone, Default)]
pub struct RegionMerger {
    /// Maximum gap between windows to merge (default: 0)
    pub distance: u64,
}

impl RegionMerger {
    pub fn new() -> Self {
        Self { distance: 0 }
    }

    /// Set the maximum merge distance.
    pub fn with_distance(mut self, d: u64) -> Self {
        self.distance = d;
        self
    }

    /// Merge the enriched windows of one reference sequence.
    ///
    /// Output regions are in increasing start order and never overlap.
    pub fn merge(&self, mut windows: Vec<Window>) -> Vec<MergedRegion> {
        windows.sort_unstable();
        self.merge_sorted(&windows)
    }

    /// Merge windows already sorted by (start, end).
    fn merge_sorted(&self, windows: &[Window]) -> Vec<MergedRegion> {
        let Some((first, rest)) = windows.split_first() else {
            return Vec::new();
        };

        let mut result = Vec::new();
        let mut current = MergedRegion::from(*first);

        for window in rest {
            if self.should_merge(&current, window) {
                current.end = current.end.max(window.end);
            } else {
                result.push(current);
                current = MergedRegion::from(*window);
            }
        }

        result.push(current);
        result
    }

    /// Check if a window continues the current region.
    #[inline]
    fn should_merge(&self, current: &MergedRegion, window: &Window) -> bool {
        current.gap_to(window) <= self.distance as i128
    }

    /// Merge every reference's windows. References without enriched windows
    /// are left out.
    pub fn merge_all<I>(&self, enriched: I) -> RegionMap
    where
        I: IntoIterator<Item = (String, Vec<Window>)>,
    {
        enriched
            .into_iter()
            .filter(|(_, windows)| !windows.is_empty())
            .map(|(reference_id, windows)| (reference_id, self.merge(windows)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(start: u64, end: u64) -> Window {
        Window { start, end }
    }

    #[test]
    fn test_adjacent_windows_merge() {
        let merger = RegionMerger::new();
        let merged = merger.merge(vec![w(100, 200), w(0, 100), w(300, 400)]);

        assert_eq!(merged, vec![MergedRegion::new(0, 200), MergedRegion::new(300, 400)]);
    }

    #[test]
    fn test_merge_with_distance() {
        let merger = RegionMerger::new().with_distance(100);
        let merged = merger.merge(vec![w(0, 100), w(200, 300), w(500, 600)]);

        assert_eq!(merged, vec![MergedRegion::new(0, 300), MergedRegion::new(500, 600)]);
    }

    #[test]
    fn test_gap_just_over_distance() {
        let merger = RegionMerger::new().with_distance(99);
        let merged = merger.merge(vec![w(0, 100), w(200, 300)]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_overlapping_and_contained() {
        let merger = RegionMerger::new();
        let merged = merger.merge(vec![w(0, 400), w(150, 250), w(100, 200)]);
        assert_eq!(merged, vec![MergedRegion::new(0, 400)]);
    }

    #[test]
    fn test_empty() {
        assert!(RegionMerger::new().merge(Vec::new()).is_empty());
    }

    #[test]
    fn test_merge_all_keeps_references_apart() {
        let merger = RegionMerger::new().with_distance(1000);
        let regions = merger.merge_all(vec![
            ("chr2".to_string(), vec![w(0, 100)]),
            ("chr1".to_string(), vec![w(500, 600), w(0, 100)]),
            ("chr3".to_string(), Vec::new()),
        ]);

        let ids: Vec<&String> = regions.keys().collect();
        assert_eq!(ids, vec!["chr1", "chr2"]);
        assert_eq!(regions["chr1"], vec![MergedRegion::new(0, 600)]);
        assert_eq!(regions["chr2"], vec![MergedRegion::new(0, 100)]);
    }
}
