use std::io::{Read, Write};
use std::path::Path;

use derive_getters::{Dissolve, Getters};
use eyre::{ensure, OptionExt, Result, WrapErr};
use readcov_core_rs::loc::{Interval, IntervalOp, Locus};
use readcov_core_rs::source::SourceLocus;
use readcov_io_rs::cov::{self, Record};
use readcov_io_rs::{compression, ReadRecord};

use crate::accumulator::CoverageVector;

/// Serialized coverage of a single shard: a `"<position>: <count>"` line for every position of
/// the locus, in ascending order. Write-once artifact exchanged between the map and reduce phases.
#[derive(Clone, Debug, PartialEq, Eq, Dissolve, Getters)]
pub struct ShardOutput {
    locus: SourceLocus,
    text: String,
}

impl ShardOutput {
    pub fn serialize(contig: impl Into<String>, vector: &CoverageVector) -> Self {
        let text = vector
            .iter()
            .map(|x| format!("{}\n", Record::from(x)))
            .collect();
        Self {
            locus: Locus::new(contig.into(), *vector.interval()),
            text,
        }
    }

    /// Decode the coverage vector back. Fails unless every position of the locus is listed once and
    /// in order.
    pub fn parse(&self) -> Result<CoverageVector> {
        let records = self.records()?;
        let interval = *self.locus.interval();
        for (expected, record) in (interval.start()..=interval.end()).zip(&records) {
            ensure!(
                record.position == expected,
                "Coverage of {} is not dense: expected position {}, found {}",
                self.locus,
                expected,
                record.position
            );
        }
        let counts = records.into_iter().map(|x| x.count).collect();
        CoverageVector::from_counts(interval, counts)
            .wrap_err_with(|| format!("Coverage of {} is incomplete", self.locus))
    }

    pub fn records(&self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        cov::Reader::new(self.text.as_bytes()).read_to_end(&mut records)?;
        Ok(records)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// Restore a shard output from its text. The interval is taken from the first and last lines.
    pub fn from_text(contig: impl Into<String>, text: String) -> Result<Self> {
        let mut records = Vec::new();
        cov::Reader::new(text.as_bytes()).read_to_end(&mut records)?;

        let first = records.first().ok_or_eyre("Shard output must not be empty")?;
        let last = records.last().ok_or_eyre("Shard output must not be empty")?;
        let interval = Interval::new(first.position, last.position)?;

        let output = Self {
            locus: Locus::new(contig.into(), interval),
            text,
        };
        output.parse()?;
        Ok(output)
    }

    /// Persist the output. Paths ending with `.gz` are gzip-compressed.
    pub fn to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut stream = compression::create_file(path)?;
        stream
            .write_all(self.text.as_bytes())
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        stream.finish()
    }

    pub fn from_path(contig: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut text = String::new();
        compression::read_file(path)?
            .box_bufread()
            .read_to_string(&mut text)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        Self::from_text(contig, text).wrap_err_with(|| format!("Invalid shard output {}", path.display()))
    }
}
