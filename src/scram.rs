//! Streaming reader for SCRAM alignment tables.
//!
//! Each row is `header, len, srna, position, strand, times_aligned,
//! abundance_1 .. abundance_n`. The number of trailing columns sets the
//! replicate count.

use crate::record::{AlignmentRecord, Strand};
use log::{debug, warn};
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

/// Columns before the first abundance value.
pub const FIXED_COLUMNS: usize = 6;

/// Errors that can occur while reading input or running the pipeline.
#[derive(Error, Debug)]
pub enum ScramError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error in {file} at line {line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{failed} of {total} input files could not be processed")]
    InputsFailed { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, ScramError>;

/// A streaming SCRAM CSV reader.
pub struct ScramReader<R: Read> {
    reader: csv::Reader<R>,
    name: String,
    row: csv::ByteRecord,
    replicates: Option<usize>,
    mismatch_reported: bool,
}

impl ScramReader<File> {
    /// Open a SCRAM file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self::new(file, path.display().to_string()))
    }
}

impl<R: Read> ScramReader<R> {
    /// Create a reader over any source; `name` is used in diagnostics.
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        Self {
            reader,
            name: name.into(),
            row: csv::ByteRecord::new(),
            replicates: None,
            mismatch_reported: false,
        }
    }

    /// Name of the underlying source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the next usable record, skipping rows that cannot be placed.
    pub fn read_record(&mut self) -> Result<Option<AlignmentRecord>> {
        loop {
            if !self.reader.read_byte_record(&mut self.row)? {
                return Ok(None);
            }
            let line = self.row.position().map_or(0, |p| p.line() as usize);

            if self.row.iter().all(<[u8]>::is_empty) {
                continue;
            }

            if let Some(record) = self.parse_row(line)? {
                self.check_replicates(&record, line);
                return Ok(Some(record));
            }
        }
    }

    /// Parse the current row. `Ok(None)` means the row was skipped.
    fn parse_row(&self, line: usize) -> Result<Option<AlignmentRecord>> {
        let row = &self.row;

        if row.len() < FIXED_COLUMNS {
            return Err(ScramError::Parse {
                file: self.name.clone(),
                line,
                message: format!(
                    "Expected at least {} fields, got {}",
                    FIXED_COLUMNS,
                    row.len()
                ),
            });
        }

        let position: u64 = match parse_field(&row[3]) {
            Some(p) => p,
            None => {
                self.skip_row(line, "position", &row[3]);
                return Ok(None);
            }
        };
        let times_aligned: u32 = match parse_field(&row[5]) {
            Some(t) => t,
            None => {
                self.skip_row(line, "times aligned", &row[5]);
                return Ok(None);
            }
        };

        let abundances = row
            .iter()
            .skip(FIXED_COLUMNS)
            .map(parse_abundance)
            .collect();

        Ok(Some(AlignmentRecord {
            reference_id: text_field(&row[0]).into_owned(),
            length: parse_field(&row[1]).unwrap_or(0),
            sequence: text_field(&row[2]).into_owned(),
            position,
            strand: Strand::from_field(&text_field(&row[4])),
            times_aligned,
            abundances,
        }))
    }

    fn skip_row(&self, line: usize, field: &str, value: &[u8]) {
        if line <= 1 {
            debug!("{}: treating line {} as a header row", self.name, line);
        } else {
            warn!(
                "{}:{}: skipping row with invalid {} '{}'",
                self.name,
                line,
                field,
                text_field(value)
            );
        }
    }

    fn check_replicates(&mut self, record: &AlignmentRecord, line: usize) {
        match self.replicates {
            None => self.replicates = Some(record.replicates()),
            Some(n) if n != record.replicates() && !self.mismatch_reported => {
                warn!(
                    "{}:{}: row has {} replicate columns, expected {}",
                    self.name,
                    line,
                    record.replicates(),
                    n
                );
                self.mismatch_reported = true;
            }
            Some(_) => {}
        }
    }

    /// Replicate count of the first record read, if any.
    pub fn replicates(&self) -> Option<usize> {
        self.replicates
    }

    /// Get an iterator over all records.
    pub fn records(self) -> ScramRecordIter<R> {
        ScramRecordIter { reader: self }
    }
}

/// Field text; invalid UTF-8 is replaced rather than rejected.
fn text_field(field: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(field)
}

fn parse_field<T: std::str::FromStr>(field: &[u8]) -> Option<T> {
    std::str::from_utf8(field).ok()?.parse().ok()
}

/// Abundances are non-negative; anything else reads as zero.
fn parse_abundance(field: &[u8]) -> f64 {
    parse_field::<f64>(field)
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

/// Iterator over SCRAM records.
pub struct ScramRecordIter<R: Read> {
    reader: ScramReader<R>,
}

impl<R: Read> Iterator for ScramRecordIter<R> {
    type Item = Result<AlignmentRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Read all records from a SCRAM file.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<AlignmentRecord>> {
    let reader = ScramReader::from_path(path)?;
    reader.records().collect()
}

/// Parse records from a string (useful for testing).
pub fn parse_records(content: &str) -> Result<Vec<AlignmentRecord>> {
    let reader = ScramReader::new(content.as_bytes(), "<memory>");
    reader.records().collect()
}
