// Clippy allows for the whole crate
#![allow(clippy::type_complexity)]

//! srna-enrich: small-RNA enriched region detection
//!
//! This library finds loci of concentrated small-RNA production in SCRAM
//! alignment tables. Records are binned into fixed-size windows per reference
//! sequence, windows are scored against unique-count and abundance
//! thresholds, and passing windows are merged into regions.
//!
//! # Features
//!
//! - **Parallel processing**: Uses Rayon to score reference sequences concurrently
//! - **Deterministic output**: Regions are sorted per reference before writing
//! - **Replicate aware**: Every replicate must clear the abundance cutoff
//!
//! # Example
//!
//! ```rust,no_run
//! use srna_enrich::{commands::EnrichCommand, config::EnrichConfig, store::RecordStore};
//!
//! let store = RecordStore::from_path("sample.csv").unwrap();
//! let cmd = EnrichCommand::new(EnrichConfig::default());
//! for (reference_id, regions) in cmd.find_regions(&store).unwrap() {
//!     println!("{}: {} regions", reference_id, regions.len());
//! }
//! ```

pub mod commands;
pub mod config;
pub mod interval;
pub mod output;
pub mod parallel;
pub mod record;
pub mod reference;
pub mod scram;
pub mod store;

// Re-export commonly used types
pub use config::EnrichConfig;
pub use interval::{MergedRegion, Window};
pub use record::{AlignmentRecord, Strand};
pub use reference::ReferenceSet;
pub use scram::{parse_records, read_records, ScramError, ScramReader};
pub use store::RecordStore;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::commands::{
        EnrichCommand, EnrichmentFilter, RegionMerger, SequenceExtractor, WindowAggregator,
        WindowReportCommand,
    };
    pub use crate::config::EnrichConfig;
    pub use crate::interval::{MergedRegion, Window};
    pub use crate::record::{AlignmentRecord, Strand};
    pub use crate::reference::ReferenceSet;
    pub use crate::scram::{parse_records, read_records, ScramReader};
    pub use crate::store::RecordStore;
}
