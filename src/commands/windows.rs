//! Per-window diagnostic report.
//!
//! Writes every aggregated window with its record count, per-replicate
//! averages and whether it passed the enrichment filter.

use crate::commands::aggregate::{WindowAggregator, WindowMap};
use crate::commands::filter::EnrichmentFilter;
use crate::config::EnrichConfig;
use crate::output::WindowReportWriter;
use crate::parallel::process_references;
use crate::scram::{Result, ScramError};
use crate::store::{load_inputs, RecordStore};
use log::info;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Window report command configuration.
#[derive(Debug, Clone, Default)]
pub struct WindowReportCommand {
    pub config: EnrichConfig,
    /// Only report windows that pass the filter
    pub enriched_only: bool,
}

impl WindowReportCommand {
    pub fn new(config: EnrichConfig) -> Self {
        Self {
            config,
            enriched_only: false,
        }
    }

    pub fn with_enriched_only(mut self, enriched_only: bool) -> Self {
        self.enriched_only = enriched_only;
        self
    }

    /// Aggregate every reference, keyed by reference id.
    pub fn aggregate(&self, store: &RecordStore) -> Result<BTreeMap<String, WindowMap>> {
        self.config.validate()?;
        let aggregator =
            WindowAggregator::new(self.config.window_size, self.config.max_times_aligned);
        Ok(process_references(store, |_, records| aggregator.aggregate(records))
            .into_iter()
            .collect())
    }

    /// Write the report for an in-memory store. Returns the number of rows.
    pub fn write_report<W: Write>(&self, store: &RecordStore, output: W) -> Result<usize> {
        let filter =
            EnrichmentFilter::new(self.config.min_unique_srnas, self.config.min_avg_abundance);
        let aggregated = self.aggregate(store)?;
        let replicates = aggregated
            .values()
            .flat_map(|windows| windows.values())
            .map(|stats| stats.replicates())
            .max()
            .unwrap_or(0);

        let mut writer = WindowReportWriter::new(output, replicates)?;
        let mut rows = 0;
        for (reference_id, windows) in &aggregated {
            let mut sorted: Vec<_> = windows.iter().collect();
            sorted.sort_unstable_by_key(|(window, _)| **window);

            for (window, stats) in sorted {
                let enriched = filter.is_enriched(stats);
                if self.enriched_only && !enriched {
                    continue;
                }
                writer.write_window(reference_id, window, stats, enriched)?;
                rows += 1;
            }
        }
        writer.flush()?;
        Ok(rows)
    }

    /// Execute the report over a set of SCRAM files.
    pub fn run<P: AsRef<Path>, W: Write>(&self, inputs: &[P], output: W) -> Result<usize> {
        self.config.validate()?;

        let loaded = load_inputs(inputs);
        let rows = self.write_report(&loaded.store, output)?;
        info!("Total windows written: {}", rows);

        if loaded.failed > 0 {
            return Err(ScramError::InputsFailed {
                failed: loaded.failed,
                total: loaded.total,
            });
        }
        Ok(rows)
    }
}
