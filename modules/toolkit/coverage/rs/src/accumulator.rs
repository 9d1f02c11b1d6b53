use derive_getters::{Dissolve, Getters};
use eyre::{ensure, OptionExt, Result};
use readcov_core_rs::loc::{Interval, IntervalOp};
use readcov_core_rs::source::{Page, ReadAlignment};

/// Dense per-position read counts over a closed interval: exactly one count per position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Dissolve, Getters)]
pub struct CoverageVector {
    interval: Interval<u64>,
    counts: Vec<u64>,
}

// IntervalOp::len overflows for [0, u64::MAX]
fn dense_len(interval: &Interval<u64>) -> Result<usize> {
    (interval.end() - interval.start())
        .checked_add(1)
        .and_then(|len| usize::try_from(len).ok())
        .ok_or_eyre("Interval is too long for a dense coverage vector")
}

impl CoverageVector {
    /// Zero coverage at every position of the interval.
    pub fn zeros(interval: Interval<u64>) -> Result<Self> {
        let len = dense_len(&interval)?;
        Ok(Self {
            interval,
            counts: vec![0; len],
        })
    }

    pub fn from_counts(interval: Interval<u64>, counts: Vec<u64>) -> Result<Self> {
        let len = dense_len(&interval)?;
        ensure!(
            counts.len() == len,
            "Coverage over {} must have {} counts, got {}",
            interval,
            len,
            counts.len()
        );
        Ok(Self { interval, counts })
    }

    pub fn get(&self, position: u64) -> Option<u64> {
        if !self.interval.contains(position) {
            return None;
        }
        let offset = usize::try_from(position - self.interval.start()).ok()?;
        self.counts.get(offset).copied()
    }

    /// `(position, count)` pairs in ascending order of positions.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        (self.interval.start()..=self.interval.end()).zip(self.counts.iter().copied())
    }

    /// Increment every position of `span` that falls inside the vector. Returns whether they overlap.
    pub fn add(&mut self, span: &Interval<u64>) -> bool {
        let Some(overlap) = self.interval.intersection(span) else {
            return false;
        };
        // Offsets fit usize because the vector was allocated with this length
        let first = (overlap.start() - self.interval.start()) as usize;
        let last = (overlap.end() - self.interval.start()) as usize;
        for count in &mut self.counts[first..=last] {
            *count += 1;
        }
        true
    }
}

impl IntervalOp for CoverageVector {
    type Idx = u64;

    fn start(&self) -> Self::Idx {
        self.interval.start()
    }

    fn end(&self) -> Self::Idx {
        self.interval.end()
    }
}

/// Map step of a single shard: turns pages of reads into a [`CoverageVector`].
///
/// Reads partially outside the interval contribute only their overlapping positions, reads
/// without aligned bases or entirely outside contribute nothing.
#[derive(Clone, Debug, Getters)]
pub struct CoverageAccumulator {
    vector: CoverageVector,
    pages: usize,
    reads: usize,
}

impl CoverageAccumulator {
    pub fn new(interval: Interval<u64>) -> Result<Self> {
        Ok(Self {
            vector: CoverageVector::zeros(interval)?,
            pages: 0,
            reads: 0,
        })
    }

    pub fn consume(&mut self, page: &Page) {
        self.pages += 1;
        for read in page.reads() {
            self.add(read);
        }
    }

    pub fn add(&mut self, read: &ReadAlignment) {
        self.reads += 1;
        if let Some(span) = read.covered() {
            self.vector.add(&span);
        }
    }

    pub fn finish(self) -> CoverageVector {
        self.vector
    }
}

/// Coverage of the interval given all pages of reads returned for it.
pub fn accumulate<'a>(
    interval: Interval<u64>,
    pages: impl IntoIterator<Item = &'a Page>,
) -> Result<CoverageVector> {
    let mut accumulator = CoverageAccumulator::new(interval)?;
    for page in pages {
        accumulator.consume(page);
    }
    Ok(accumulator.finish())
}
