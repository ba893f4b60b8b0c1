//! Subsequence extraction for merged regions.

use crate::commands::merge::RegionMap;
use crate::reference::ReferenceSet;
use log::debug;

/// A labelled slice of a reference sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSequence<'a> {
    /// `{reference_id}_region_{n}`, `n` counting from 1 per reference
    pub label: String,
    pub sequence: &'a [u8],
}

/// Slices merged regions out of loaded reference sequences.
#[derive(Debug, Clone, Default)]
pub struct SequenceExtractor;

impl SequenceExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract every region whose reference is present in `references`.
    ///
    /// Regions are clipped to the sequence length. References missing from
    /// the set are skipped, as are regions starting at or past the end of
    /// their sequence; skipped regions keep their index so labels stay tied
    /// to the region's position in the merged list.
    pub fn extract<'a>(
        &self,
        regions: &RegionMap,
        references: &'a ReferenceSet,
    ) -> Vec<ExtractedSequence<'a>> {
        let mut extracted = Vec::new();

        for (reference_id, merged) in regions {
            let Some(sequence) = references.sequence(reference_id) else {
                debug!("No reference sequence for {}, skipping", reference_id);
                continue;
            };
            let seq_len = sequence.len() as u64;

            for (i, region) in merged.iter().enumerate() {
                if region.start >= seq_len {
                    debug!(
                        "{}_region_{} starts at {} past sequence end {}",
                        reference_id,
                        i + 1,
                        region.start,
                        seq_len
                    );
                    continue;
                }
                let clipped = region.clamped(seq_len);
                extracted.push(ExtractedSequence {
                    label: format!("{}_region_{}", reference_id, i + 1),
                    sequence: &sequence[clipped.start as usize..clipped.end as usize],
                });
            }
        }

        extracted
    }
}
