use std::io::BufRead;
use std::path::Path;

use eyre::{Context, Result};

use super::record::Record;
use crate::compression;
use crate::ReadRecord;

pub struct Reader<R> {
    reader: R,
    buffer: String,
    line: usize,
}

impl<R: BufRead> Reader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            line: 0,
        }
    }
}

impl Reader<Box<dyn BufRead + Send + Sync + 'static>> {
    /// Open a coverage file. Gzip compression is detected from the file signature.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let stream = compression::read_file(path)?;
        Ok(Self::new(stream.box_bufread()))
    }
}

impl<R: BufRead> ReadRecord for Reader<R> {
    type Record = Record;

    fn read_record(&mut self, into: &mut Self::Record) -> Result<bool> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(false);
            }
            self.line += 1;

            // Blank lines are skipped, e.g. the trailing one in concatenated outputs
            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }

            *into = Record::parse(line)
                .wrap_err_with(|| format!("Failed to parse coverage line {}", self.line))?;
            return Ok(true);
        }
    }
}
