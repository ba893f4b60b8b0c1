//! FASTA reference loader.
//!
//! A line starting with `>` opens a new sequence named by the rest of the
//! line; following lines are concatenated until the next header.

use crate::scram::Result;
use log::{info, warn};
use memchr::memchr;
use memmap2::Mmap;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Minimum file size to use mmap (smaller files are read into a buffer)
const MMAP_THRESHOLD: usize = 64 * 1024;

/// Reference sequences keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    sequences: FxHashMap<String, Vec<u8>>,
}

impl ReferenceSet {
    /// Create an empty reference set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load sequences from a FASTA file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let file_size = file.metadata()?.len() as usize;

        let set = if file_size >= MMAP_THRESHOLD {
            // SAFETY: the map is read-only and dropped before returning.
            let mmap = unsafe { Mmap::map(&file)? };
            Self::parse(&mmap)
        } else {
            let mut data = Vec::with_capacity(file_size);
            file.read_to_end(&mut data)?;
            Self::parse(&data)
        };

        info!(
            "Loaded {} reference sequences from {}",
            set.len(),
            path.display()
        );
        Ok(set)
    }

    /// Parse FASTA content held in memory.
    pub fn parse(data: &[u8]) -> Self {
        let mut set = Self::new();
        let mut name: Option<String> = None;
        let mut seq: Vec<u8> = Vec::new();
        let mut orphan_lines = 0usize;

        for line in lines(data) {
            let line = line.trim_ascii();
            if let Some(header) = line.strip_prefix(b">") {
                if let Some(prev) = name.take() {
                    set.insert(prev, std::mem::take(&mut seq));
                }
                name = Some(String::from_utf8_lossy(header.trim_ascii()).into_owned());
            } else if line.is_empty() {
                continue;
            } else if name.is_some() {
                seq.extend_from_slice(line);
            } else {
                orphan_lines += 1;
            }
        }

        if let Some(prev) = name {
            set.insert(prev, seq);
        }
        if orphan_lines > 0 {
            warn!(
                "Ignored {} sequence lines before the first FASTA header",
                orphan_lines
            );
        }

        set
    }

    /// Insert a sequence; a repeated name replaces the earlier sequence.
    pub fn insert(&mut self, name: String, sequence: Vec<u8>) {
        self.sequences.insert(name, sequence);
    }

    /// Get the sequence for a name.
    #[inline]
    pub fn sequence(&self, name: &str) -> Option<&[u8]> {
        self.sequences.get(name).map(Vec::as_slice)
    }

    /// Get the length of a sequence.
    #[inline]
    pub fn len_of(&self, name: &str) -> Option<u64> {
        self.sequences.get(name).map(|s| s.len() as u64)
    }

    /// Get number of sequences.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

/// Split a buffer into lines with memchr, dropping the terminator.
fn lines(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = data;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match memchr(b'\n', rest) {
            Some(pos) => {
                let line = &rest[..pos];
                rest = &rest[pos + 1..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = &[];
                Some(line)
            }
        }
    })
}
