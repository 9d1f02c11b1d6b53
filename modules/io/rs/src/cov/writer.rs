use std::io::Write;
use std::path::Path;

use eyre::Result;

use super::record::Record;
use crate::compression::{self, CompressedStream};
use crate::WriteRecord;

pub struct Writer<W> {
    writer: W,
}

impl<W: Write> Writer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl Writer<CompressedStream> {
    /// Create a coverage file. Paths ending with `.gz` are gzip-compressed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(compression::create_file(path)?))
    }

    /// Flush everything to disk. Must be called before dropping file-backed writers.
    pub fn finish(self) -> Result<()> {
        self.writer.finish()
    }
}

impl<W: Write> WriteRecord for Writer<W> {
    type Record = Record;

    fn write_record(&mut self, record: &Self::Record) -> Result<()> {
        writeln!(self.writer, "{}: {}", record.position, record.count)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
