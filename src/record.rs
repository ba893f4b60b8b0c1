//! Alignment records as read from SCRAM output.

use std::fmt;

/// One aligned small RNA.
///
/// `abundances` holds one value per replicate sample; index `i` refers to the
/// same replicate in every record of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord {
    pub reference_id: String,
    pub length: u32,
    pub sequence: String,
    pub position: u64,
    pub strand: Strand,
    pub times_aligned: u32,
    pub abundances: Vec<f64>,
}

impl AlignmentRecord {
    /// Create a record with default length, sequence and strand.
    pub fn new(
        reference_id: impl Into<String>,
        position: u64,
        times_aligned: u32,
        abundances: Vec<f64>,
    ) -> Self {
        Self {
            reference_id: reference_id.into(),
            length: 0,
            sequence: String::new(),
            position,
            strand: Strand::Unknown,
            times_aligned,
            abundances,
        }
    }

    /// Set the read sequence; the length follows it.
    pub fn with_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = sequence.into();
        self.length = self.sequence.len() as u32;
        self
    }

    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.strand = strand;
        self
    }

    /// Number of replicate columns carried by this record.
    #[inline]
    pub fn replicates(&self) -> usize {
        self.abundances.len()
    }
}

/// Strand orientation of an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Plus,
    Minus,
    Unknown,
}

impl Strand {
    pub fn from_field(s: &str) -> Self {
        match s.trim() {
            "+" => Strand::Plus,
            "-" => Strand::Minus,
            _ => Strand::Unknown,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
            Strand::Unknown => write!(f, "."),
        }
    }
}
