//! In-memory grouping of alignment records by reference sequence.

use crate::record::AlignmentRecord;
use crate::scram::{Result, ScramReader};
use log::{error, info};
use rustc_hash::FxHashMap;
use std::io::Read;
use std::path::Path;

/// Records pooled from a set of input files, with the files that failed.
#[derive(Debug, Default)]
pub struct LoadedInputs {
    pub store: RecordStore,
    pub total: usize,
    pub failed: usize,
}

/// Read and pool several SCRAM files.
///
/// A file that cannot be opened or hits a fatal row error is reported and
/// contributes nothing; the remaining files are still read.
pub fn load_inputs<P: AsRef<Path>>(paths: &[P]) -> LoadedInputs {
    let mut loaded = LoadedInputs {
        total: paths.len(),
        ..Default::default()
    };

    for path in paths {
        let path = path.as_ref();
        match RecordStore::from_path(path) {
            Ok(store) => loaded.store.absorb(store),
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                loaded.failed += 1;
            }
        }
    }

    loaded
}

/// Alignment records pooled by reference id, across any number of inputs.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    groups: FxHashMap<String, Vec<AlignmentRecord>>,
    total: usize,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list of records.
    pub fn from_records(records: impl IntoIterator<Item = AlignmentRecord>) -> Self {
        let mut store = Self::new();
        store.extend(records);
        store
    }

    /// Read every record of one SCRAM file.
    ///
    /// The file is read completely before anything is returned, so a fatal
    /// row error leaves no partial records behind.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = ScramReader::from_path(path)?;
        Self::from_reader(reader)
    }

    /// Read every record from an open SCRAM reader.
    pub fn from_reader<R: Read>(mut reader: ScramReader<R>) -> Result<Self> {
        let mut store = Self::new();
        while let Some(record) = reader.read_record()? {
            store.push(record);
        }
        info!(
            "Parsed {} records on {} references from {} ({} replicates)",
            store.len(),
            store.num_references(),
            reader.name(),
            reader.replicates().unwrap_or(0)
        );
        Ok(store)
    }

    /// Add one record.
    pub fn push(&mut self, record: AlignmentRecord) {
        self.groups
            .entry(record.reference_id.clone())
            .or_default()
            .push(record);
        self.total += 1;
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = AlignmentRecord>) {
        for record in records {
            self.push(record);
        }
    }

    /// Pool another store into this one; records sharing a reference id end
    /// up in the same list.
    pub fn absorb(&mut self, other: RecordStore) {
        for (reference_id, records) in other.groups {
            self.total += records.len();
            self.groups.entry(reference_id).or_default().extend(records);
        }
    }

    /// Records for one reference id.
    #[inline]
    pub fn get(&self, reference_id: &str) -> Option<&[AlignmentRecord]> {
        self.groups.get(reference_id).map(Vec::as_slice)
    }

    /// Reference ids in lexicographic order.
    pub fn reference_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over `(reference_id, records)` groups in no particular order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[AlignmentRecord])> {
        self.groups
            .iter()
            .map(|(id, records)| (id.as_str(), records.as_slice()))
    }

    /// Largest alignment position seen for a reference id.
    pub fn max_position(&self, reference_id: &str) -> Option<u64> {
        self.groups
            .get(reference_id)?
            .iter()
            .map(|r| r.position)
            .max()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct reference ids.
    pub fn num_references(&self) -> usize {
        self.groups.len()
    }
}
