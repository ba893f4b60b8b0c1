//! Pipeline stages and the commands built from them.

pub mod aggregate;
pub mod enrich;
pub mod extract;
pub mod filter;
pub mod merge;
pub mod windows;

pub use aggregate::{WindowAggregator, WindowMap, WindowStats};
pub use enrich::{EnrichCommand, EnrichStats};
pub use extract::{ExtractedSequence, SequenceExtractor};
pub use filter::EnrichmentFilter;
pub use merge::{RegionMap, RegionMerger};
pub use windows::WindowReportCommand;
