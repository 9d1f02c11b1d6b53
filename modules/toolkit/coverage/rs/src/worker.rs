use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use eyre::{ensure, Report, Result};
use readcov_core_rs::source::{Pager, ReadSource, Step};

use crate::accumulator::CoverageAccumulator;
use crate::result::Stats;
use crate::shard_output::ShardOutput;
use crate::sharder::Shard;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Finished,
    Cancelled,
}

/// Per-thread state of a run: outputs of all shards processed by the thread so far.
#[derive(Debug, Default)]
pub struct Worker {
    finished: Vec<(ShardOutput, Stats)>,
}

impl Worker {
    pub fn reset(&mut self) {
        self.finished.clear();
    }

    /// Walk all pages of the shard and serialize its coverage.
    ///
    /// The cancellation flag is checked before every request. Cancelled shards produce nothing.
    pub fn process<S: ReadSource + ?Sized>(
        &mut self,
        shard: &Shard,
        source: &mut S,
        cancelled: &AtomicBool,
    ) -> Result<Outcome> {
        let launched_at = Instant::now();
        let mut accumulator = CoverageAccumulator::new(*shard.locus().interval())?;
        let mut pager = Pager::new(shard.locus().clone());

        loop {
            if cancelled.load(Ordering::Relaxed) {
                log::debug!(
                    "Shard #{} ({}) cancelled after {} pages",
                    shard.index(),
                    shard.locus(),
                    pager.pages()
                );
                return Ok(Outcome::Cancelled);
            }

            match pager.advance(source) {
                Step::Page(page) => accumulator.consume(&page),
                Step::Done => break,
                Step::Failed(err) => return Err(Report::new(err)),
            }
        }

        let stats = Stats::new(
            *shard.index(),
            shard.locus().clone(),
            *accumulator.pages(),
            *accumulator.reads(),
            launched_at.elapsed().as_secs_f64(),
        );
        let output = ShardOutput::serialize(shard.locus().contig().clone(), &accumulator.finish());
        log::debug!(
            "Shard #{} ({}) finished: {} pages, {} reads in {:.3}s",
            stats.index(),
            stats.locus(),
            stats.pages(),
            stats.reads(),
            stats.time_s()
        );

        self.finished.push((output, stats));
        Ok(Outcome::Finished)
    }

    /// Gather the outputs of all workers, ordered by shard index.
    pub fn collapse<'a>(
        shards: usize,
        workers: impl Iterator<Item = &'a mut Self>,
    ) -> Result<(Vec<ShardOutput>, Vec<Stats>)> {
        let mut collapsed: Vec<_> = workers.flat_map(|x| x.finished.drain(..)).collect();
        collapsed.sort_by_key(|(_, stats)| *stats.index());

        ensure!(
            collapsed.len() == shards
                && collapsed
                    .iter()
                    .enumerate()
                    .all(|(ind, (_, stats))| *stats.index() == ind),
            "Expected outputs for {} shards, got {}. This is a bug, please fill an issue.",
            shards,
            collapsed.len()
        );
        Ok(collapsed.into_iter().unzip())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readcov_core_rs::source::{ApiError, Cursor, Page, SourceLocus};
    use readcov_io_rs::mock::MockReadSource;

    fn shard(index: usize, start: u64, end: u64) -> Shard {
        Shard::new(index, SourceLocus::try_from(("chr1".to_string(), start, end)).unwrap())
    }

    #[derive(Clone)]
    struct Unavailable;

    impl ReadSource for Unavailable {
        fn fetch_page(&mut self, _: &SourceLocus, _: Option<&Cursor>) -> Result<Page, ApiError> {
            Err(ApiError::Upstream {
                status: Some(503),
                message: None,
            })
        }
    }

    #[test]
    fn test_process_and_collapse() -> Result<()> {
        let cancelled = AtomicBool::new(false);
        let mut source = MockReadSource::new();

        let (mut first, mut second) = (Worker::default(), Worker::default());
        first.process(&shard(1, 150, 250), &mut source, &cancelled)?;
        second.process(&shard(0, 0, 149), &mut source, &cancelled)?;

        let (outputs, stats) = Worker::collapse(2, [&mut first, &mut second].into_iter())?;
        assert_eq!(outputs[0].locus().to_string(), "chr1:0-149");
        assert_eq!(outputs[1].lines().count(), 101);
        assert_eq!(*stats[0].pages(), 2);
        assert_eq!(*stats[1].pages(), 2);
        assert_eq!(*stats[1].reads(), 198);

        // Workers are drained by the collapse
        assert!(Worker::collapse(2, [&mut first, &mut second].into_iter()).is_err());
        Ok(())
    }

    #[test]
    fn test_cancelled() -> Result<()> {
        let cancelled = AtomicBool::new(true);
        let mut worker = Worker::default();
        let outcome = worker.process(&shard(0, 0, 10), &mut Unavailable, &cancelled)?;
        assert_eq!(outcome, Outcome::Cancelled);
        assert!(worker.finished.is_empty());
        Ok(())
    }

    #[test]
    fn test_failure() {
        let cancelled = AtomicBool::new(false);
        let mut worker = Worker::default();
        let err = worker
            .process(&shard(0, 0, 10), &mut Unavailable, &cancelled)
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ApiError>(),
            Some(&ApiError::Upstream {
                status: Some(503),
                message: None
            })
        );
        assert!(worker.finished.is_empty());
    }
}
