//! Enriched region detection: the full aggregation, filter and merge pipeline.
//!
//! Algorithm:
//! 1. Pool records from every input by reference id
//! 2. Aggregate and filter each reference in parallel
//! 3. Wait for every reference, then merge windows per reference
//! 4. Clamp region ends and write rows in reference order
//! 5. Optionally slice region sequences out of a FASTA reference

use crate::commands::aggregate::WindowAggregator;
use crate::commands::extract::SequenceExtractor;
use crate::commands::filter::EnrichmentFilter;
use crate::commands::merge::{RegionMap, RegionMerger};
use crate::config::EnrichConfig;
use crate::interval::{MergedRegion, Window};
use crate::output::{FastaWriter, RegionWriter};
use crate::parallel::{process_references, ParallelStats};
use crate::record::AlignmentRecord;
use crate::reference::ReferenceSet;
use crate::scram::{Result, ScramError};
use crate::store::{load_inputs, RecordStore};
use log::{debug, error, info};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Statistics from an enrichment run.
#[derive(Debug, Default, Clone)]
pub struct EnrichStats {
    pub inputs: usize,
    pub inputs_failed: usize,
    pub records: usize,
    pub references: usize,
    pub enriched_windows: usize,
    pub regions: usize,
    pub sequences_written: usize,
}

impl EnrichStats {
    /// Turn failed inputs into [`ScramError::InputsFailed`].
    pub fn into_result(self) -> Result<Self> {
        if self.inputs_failed > 0 {
            return Err(ScramError::InputsFailed {
                failed: self.inputs_failed,
                total: self.inputs,
            });
        }
        Ok(self)
    }
}

impl std::fmt::Display for EnrichStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Inputs: {} ({} failed), Records: {}, References: {}, Enriched windows: {}, Regions: {}, Sequences: {}",
            self.inputs,
            self.inputs_failed,
            self.records,
            self.references,
            self.enriched_windows,
            self.regions,
            self.sequences_written
        )
    }
}

/// Enrich command configuration.
#[derive(Debug, Clone, Default)]
pub struct EnrichCommand {
    pub config: EnrichConfig,
    /// Optional FASTA reference for end clamping and sequence output
    pub reference: Option<PathBuf>,
}

impl EnrichCommand {
    pub fn new(config: EnrichConfig) -> Self {
        Self {
            config,
            reference: None,
        }
    }

    /// Set the FASTA reference.
    pub fn with_reference(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference = Some(path.into());
        self
    }

    fn aggregator(&self) -> WindowAggregator {
        WindowAggregator::new(self.config.window_size, self.config.max_times_aligned)
    }

    fn enrichment_filter(&self) -> EnrichmentFilter {
        EnrichmentFilter::new(self.config.min_unique_srnas, self.config.min_avg_abundance)
    }

    fn merger(&self) -> RegionMerger {
        RegionMerger::new().with_distance(self.config.merge_distance)
    }

    /// Aggregate and filter the records of a single reference.
    pub fn enriched_windows(&self, records: &[AlignmentRecord]) -> Result<Vec<Window>> {
        self.config.validate()?;
        let windows = self.aggregator().aggregate(records);
        Ok(self.enrichment_filter().filter(&windows))
    }

    /// Enriched windows for every reference in the store.
    ///
    /// References are processed concurrently; the result holds every
    /// reference, in unspecified order.
    pub fn find_enriched(&self, store: &RecordStore) -> Result<Vec<(String, Vec<Window>)>> {
        self.config.validate()?;
        let aggregator = self.aggregator();
        let filter = self.enrichment_filter();

        Ok(process_references(store, |reference_id, records| {
            let windows = aggregator.aggregate(records);
            let enriched = filter.filter(&windows);
            debug!(
                "{}: {} windows, {} enriched",
                reference_id,
                windows.len(),
                enriched.len()
            );
            enriched
        }))
    }

    /// Merged regions for every reference that has enriched windows.
    pub fn find_regions(&self, store: &RecordStore) -> Result<RegionMap> {
        let enriched = self.find_enriched(store)?;
        Ok(self.merger().merge_all(enriched))
    }

    /// Upper bound for region ends on a reference: the reference length when
    /// known, otherwise the largest observed alignment position.
    pub fn end_bound(
        reference_id: &str,
        store: &RecordStore,
        references: Option<&ReferenceSet>,
    ) -> Option<u64> {
        references
            .and_then(|refs| refs.len_of(reference_id))
            .or_else(|| store.max_position(reference_id))
    }

    /// Regions with their ends clamped, in output order.
    pub fn clamped_regions<'a>(
        regions: &'a RegionMap,
        store: &RecordStore,
        references: Option<&ReferenceSet>,
    ) -> Vec<(&'a str, MergedRegion)> {
        let mut rows = Vec::new();
        for (reference_id, merged) in regions {
            let bound = Self::end_bound(reference_id, store, references);
            for region in merged {
                let region = match bound {
                    Some(b) => region.clamped(b),
                    None => *region,
                };
                rows.push((reference_id.as_str(), region));
            }
        }
        rows
    }

    /// Execute the pipeline over a set of SCRAM files.
    ///
    /// Same as [`EnrichCommand::execute`], but input failures become
    /// [`ScramError::InputsFailed`] once every output has been written.
    pub fn run<P: AsRef<Path>, W: Write, F: Write>(
        &self,
        inputs: &[P],
        output: W,
        fasta: Option<F>,
    ) -> Result<EnrichStats> {
        self.execute(inputs, output, fasta)?.into_result()
    }

    /// Run the pipeline and report failed inputs in the returned stats.
    ///
    /// Regions go to `output` as CSV; extracted sequences go to `fasta` when
    /// given and a non-empty reference was loaded. Unreadable inputs are
    /// logged and skipped, and the rest of the run still completes.
    pub fn execute<P: AsRef<Path>, W: Write, F: Write>(
        &self,
        inputs: &[P],
        output: W,
        fasta: Option<F>,
    ) -> Result<EnrichStats> {
        self.config.validate()?;

        let loaded = load_inputs(inputs);
        let store = loaded.store;
        let mut failed = loaded.failed;
        let mut total = loaded.total;

        let references = match &self.reference {
            Some(path) => {
                total += 1;
                match ReferenceSet::from_path(path) {
                    Ok(set) => Some(set),
                    Err(e) => {
                        error!("Error loading reference sequences from {}: {}", path.display(), e);
                        failed += 1;
                        None
                    }
                }
            }
            None => None,
        };

        let layout = ParallelStats::from_store(&store);
        debug!(
            "Largest references: {:?}",
            &layout.records_per_reference[..layout.records_per_reference.len().min(5)]
        );

        let enriched = self.find_enriched(&store)?;
        let enriched_windows: usize = enriched.iter().map(|(_, w)| w.len()).sum();
        let regions = self.merger().merge_all(enriched);

        let mut writer = RegionWriter::new(output)?;
        for (reference_id, region) in Self::clamped_regions(&regions, &store, references.as_ref()) {
            writer.write_region(reference_id, &region)?;
        }
        writer.flush()?;

        let mut sequences_written = 0;
        if let (Some(out), Some(refs)) = (fasta, references.as_ref()) {
            if refs.is_empty() {
                info!("Reference holds no sequences, skipping FASTA output");
            } else {
                let mut fasta_writer = FastaWriter::new(out);
                for seq in SequenceExtractor::new().extract(&regions, refs) {
                    fasta_writer.write_sequence(&seq)?;
                    sequences_written += 1;
                }
                fasta_writer.flush()?;
            }
        }

        let stats = EnrichStats {
            inputs: total,
            inputs_failed: failed,
            records: store.len(),
            references: store.num_references(),
            enriched_windows,
            regions: writer.rows(),
            sequences_written,
        };
        debug!("Run summary: {}", stats);
        Ok(stats)
    }
}
