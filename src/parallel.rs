//! Parallel per-reference processing using Rayon.

use crate::record::AlignmentRecord;
use crate::store::RecordStore;
use rayon::prelude::*;

/// Minimum number of records before enabling parallelization.
/// Below this threshold, sequential processing is faster due to
/// thread spawn overhead.
pub const PARALLEL_THRESHOLD: usize = 10_000;

/// Run `f` once per reference sequence and collect every result.
///
/// Each task sees only its own record slice. The call returns after every
/// task has finished, so callers always get the complete result set; its
/// order is unspecified.
pub fn process_references<F, T>(store: &RecordStore, f: F) -> Vec<(String, T)>
where
    F: Fn(&str, &[AlignmentRecord]) -> T + Sync + Send,
    T: Send,
{
    let groups: Vec<(&str, &[AlignmentRecord])> = store.groups().collect();

    if store.len() < PARALLEL_THRESHOLD {
        groups
            .into_iter()
            .map(|(reference_id, records)| (reference_id.to_string(), f(reference_id, records)))
            .collect()
    } else {
        groups
            .into_par_iter()
            .map(|(reference_id, records)| (reference_id.to_string(), f(reference_id, records)))
            .collect()
    }
}

/// Record counts per reference, largest first.
#[derive(Debug, Clone)]
pub struct ParallelStats {
    pub total_records: usize,
    pub num_references: usize,
    pub records_per_reference: Vec<(String, usize)>,
}

impl ParallelStats {
    pub fn from_store(store: &RecordStore) -> Self {
        let mut records_per_reference: Vec<(String, usize)> = store
            .groups()
            .map(|(id, records)| (id.to_string(), records.len()))
            .collect();
        records_per_reference.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            total_records: store.len(),
            num_references: store.num_references(),
            records_per_reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(n: usize) -> RecordStore {
        RecordStore::from_records((0..n).map(|i| {
            let reference = format!("chr{}", i % 7);
            AlignmentRecord::new(reference, i as u64, 1, vec![1.0])
        }))
    }

    #[test]
    fn test_every_reference_processed() {
        for n in [10, PARALLEL_THRESHOLD + 10] {
            let store = store_with(n);
            let mut results = process_references(&store, |_, records| records.len());
            results.sort();

            assert_eq!(results.len(), 7);
            assert_eq!(results.iter().map(|(_, c)| c).sum::<usize>(), n);
            assert_eq!(results[0].0, "chr0");
        }
    }

    #[test]
    fn test_empty_store() {
        let results = process_references(&RecordStore::new(), |_, records| records.len());
        assert!(results.is_empty());
    }

    #[test]
    fn test_parallel_stats() {
        let store = RecordStore::from_records(vec![
            AlignmentRecord::new("chr2", 1, 1, vec![]),
            AlignmentRecord::new("chr1", 1, 1, vec![]),
            AlignmentRecord::new("chr1", 2, 1, vec![]),
        ]);
        let stats = ParallelStats::from_store(&store);

        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.num_references, 2);
        assert_eq!(stats.records_per_reference[0], ("chr1".to_string(), 2));
    }
}
