//! Output writers for regions, extracted sequences and window reports.
//!
//! Uses itoa for integer formatting and ryu for float formatting
//! to avoid allocation per row.

use crate::commands::aggregate::WindowStats;
use crate::commands::extract::ExtractedSequence;
use crate::interval::{MergedRegion, Window};
use crate::scram::Result;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffer size for output writers (256KB).
const BUF_SIZE: usize = 256 * 1024;

/// Open an output path, treating `-` as stdout.
pub fn create_output<P: AsRef<Path>>(path: P) -> Result<Box<dyn Write>> {
    Ok(open_output(path.as_ref())?)
}

fn open_output(path: &Path) -> io::Result<Box<dyn Write>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(io::stdout().lock()))
    } else {
        Ok(Box::new(File::create(path)?))
    }
}

/// An output path that is only created on the first write or flush.
pub struct LazyOutput {
    path: PathBuf,
    inner: Option<Box<dyn Write>>,
}

impl LazyOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: None,
        }
    }

    /// True once the underlying file has been created.
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    fn get(&mut self) -> io::Result<&mut Box<dyn Write>> {
        if self.inner.is_none() {
            self.inner = Some(open_output(&self.path)?);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| io::Error::other("output was not opened"))
    }
}

impl Write for LazyOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.get()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.get()?.flush()
    }
}

/// CSV writer for merged regions: `Header,Start,End,Length`.
pub struct RegionWriter<W: Write> {
    writer: csv::Writer<W>,
    itoa_buf: itoa::Buffer,
    rows: usize,
}

impl<W: Write> RegionWriter<W> {
    /// Create a writer and emit the header row.
    pub fn new(output: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .buffer_capacity(BUF_SIZE)
            .from_writer(output);
        writer.write_record(["Header", "Start", "End", "Length"])?;
        Ok(Self {
            writer,
            itoa_buf: itoa::Buffer::new(),
            rows: 0,
        })
    }

    /// Write one region row. `region` is expected to be clamped already.
    pub fn write_region(&mut self, reference_id: &str, region: &MergedRegion) -> Result<()> {
        self.writer.write_field(reference_id)?;
        self.writer.write_field(self.itoa_buf.format(region.start))?;
        self.writer.write_field(self.itoa_buf.format(region.end))?;
        self.writer.write_field(self.itoa_buf.format(region.len()))?;
        self.writer.write_record(None::<&[u8]>)?;
        self.rows += 1;
        Ok(())
    }

    /// Number of region rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// FASTA writer for extracted region sequences, one sequence line per record.
pub struct FastaWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> FastaWriter<W> {
    pub fn new(output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUF_SIZE, output),
        }
    }

    #[inline]
    pub fn write_sequence(&mut self, seq: &ExtractedSequence<'_>) -> Result<()> {
        self.writer.write_all(b">")?;
        self.writer.write_all(seq.label.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.write_all(seq.sequence)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// CSV writer for per-window diagnostics:
/// `Header,Start,End,UniqueCount,Avg_1..Avg_n,Enriched`.
pub struct WindowReportWriter<W: Write> {
    writer: csv::Writer<W>,
    itoa_buf: itoa::Buffer,
    ryu_buf: ryu::Buffer,
}

impl<W: Write> WindowReportWriter<W> {
    /// Create a writer and emit a header sized for `replicates` columns.
    pub fn new(output: W, replicates: usize) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .buffer_capacity(BUF_SIZE)
            .flexible(true)
            .from_writer(output);

        let mut header: Vec<String> = ["Header", "Start", "End", "UniqueCount"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        header.extend((1..=replicates).map(|i| format!("Avg_{}", i)));
        header.push("Enriched".to_string());
        writer.write_record(&header)?;

        Ok(Self {
            writer,
            itoa_buf: itoa::Buffer::new(),
            ryu_buf: ryu::Buffer::new(),
        })
    }

    pub fn write_window(
        &mut self,
        reference_id: &str,
        window: &Window,
        stats: &WindowStats,
        enriched: bool,
    ) -> Result<()> {
        self.writer.write_field(reference_id)?;
        self.writer.write_field(self.itoa_buf.format(window.start))?;
        self.writer.write_field(self.itoa_buf.format(window.end))?;
        self.writer.write_field(self.itoa_buf.format(stats.unique_count))?;
        for avg in stats.averages() {
            self.writer.write_field(self.ryu_buf.format(avg))?;
        }
        self.writer.write_field(if enriched { "true" } else { "false" })?;
        self.writer.write_record(None::<&[u8]>)?;
        Ok(())
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
