use std::io::Write;
use std::path::Path;

use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::{ensure, Result};
use itertools::Itertools;
use readcov_core_rs::source::SourceLocus;
use readcov_io_rs::cov::{self, Record};
use readcov_io_rs::{ReadRecord, WriteRecord};

/// Per-base coverage of the whole analyzed locus, ascending by position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Dissolve, Getters)]
pub struct ConsolidatedReport {
    records: Vec<Record>,
}

impl ConsolidatedReport {
    pub fn new(records: Vec<Record>) -> Result<Self> {
        ensure!(
            records
                .iter()
                .tuple_windows()
                .all(|(prev, next)| prev.position < next.position),
            "Coverage report positions must be unique and sorted in ascending order"
        );
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, position: u64) -> Option<u64> {
        self.records
            .binary_search_by_key(&position, |x| x.position)
            .ok()
            .map(|ind| self.records[ind].count)
    }

    /// `(position, count)` pairs in ascending order of positions.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.records.iter().map(|x| (x.position, x.count))
    }

    pub fn to_text(&self) -> String {
        self.records.iter().map(|x| format!("{x}\n")).collect()
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = cov::Writer::new(writer);
        writer.write_records(&self.records)?;
        writer.flush()
    }

    /// Save the report. Paths ending with `.gz` are gzip-compressed.
    pub fn to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = cov::Writer::from_path(path)?;
        writer.write_records(&self.records)?;
        writer.finish()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut records = Vec::new();
        cov::Reader::from_path(path)?.read_to_end(&mut records)?;
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a ConsolidatedReport {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[derive(Clone, PartialEq, Debug, Constructor, Dissolve, Getters)]
pub struct Stats {
    // Processed shard
    index: usize,
    locus: SourceLocus,
    // Fetched pages and reads
    pages: usize,
    reads: usize,
    // Time spent processing the shard
    time_s: f64,
}
