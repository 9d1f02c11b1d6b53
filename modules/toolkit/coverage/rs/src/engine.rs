use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use derive_more::Constructor;
use eyre::{bail, Report, Result};
use rayon::ThreadPool;
use readcov_core_rs::source::{ReadSource, SourceLocus};
use thread_local::ThreadLocal;

use crate::builder::EngineBuilder;
use crate::consolidator::consolidate;
use crate::result::{ConsolidatedReport, Stats};
use crate::sharder;
use crate::worker::Worker;

/// Computes the coverage of a locus: shards are mapped in parallel, then consolidated.
#[derive(Constructor)]
pub struct Engine {
    thread_pool: Option<ThreadPool>,
    shards: usize,
    workers: ThreadLocal<RefCell<Worker>>,
    stats: Vec<Stats>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Statistics of the last successful run, ordered by shard index.
    pub fn stats(&self) -> &[Stats] {
        &self.stats
    }

    /// Run the whole pipeline. Every thread works with its own clone of the `source`.
    ///
    /// The first failing shard cancels the rest of the run, and its error (with the shard index and
    /// locus attached) is returned instead of a report. The original [`ApiError`] is available via
    /// `Report::downcast_ref`.
    ///
    /// [`ApiError`]: readcov_core_rs::source::ApiError
    pub fn run<S: ReadSource>(
        &mut self,
        locus: &SourceLocus,
        source: &S,
    ) -> Result<ConsolidatedReport> {
        match self.thread_pool.take() {
            Some(pool) => {
                let result = pool.install(|| self._run(locus, source));
                self.thread_pool = Some(pool);
                result
            }
            None => self._run(locus, source),
        }
    }

    fn _run<S: ReadSource>(&mut self, locus: &SourceLocus, source: &S) -> Result<ConsolidatedReport> {
        let launched_at = Instant::now();

        // Soft-reset all workers
        for worker in self.workers.iter_mut() {
            worker.get_mut().reset();
        }
        self.stats.clear();

        let shards = sharder::split(locus, self.shards)?;
        log::info!("Computing coverage for {} in {} shards", locus, shards.len());

        let sources: ThreadLocal<RefCell<S>> = ThreadLocal::new();
        let has_failed = AtomicBool::new(false);
        let failure: Mutex<Option<Report>> = Mutex::new(None);

        rayon::scope(|s| {
            for shard in &shards {
                // Stop spawning as soon as any shard has failed
                if has_failed.load(Ordering::Relaxed) {
                    return;
                }

                let (sources, has_failed, failure, workers) =
                    (&sources, &has_failed, &failure, &self.workers);
                s.spawn(move |_| {
                    if has_failed.load(Ordering::Relaxed) {
                        return;
                    }

                    // Thread-local copy of the source and the worker state
                    let mut source = sources
                        .get_or(|| RefCell::new(dyn_clone::clone(source)))
                        .borrow_mut();
                    let mut worker = workers.get_or_default().borrow_mut();

                    if let Err(err) = worker.process(shard, &mut *source, has_failed) {
                        has_failed.store(true, Ordering::Relaxed);
                        log::error!("Shard #{} ({}) failed: {}", shard.index(), shard.locus(), err);

                        if let Ok(mut slot) = failure.lock() {
                            if slot.is_none() {
                                *slot = Some(err.wrap_err(format!(
                                    "Coverage of shard #{} ({}) failed",
                                    shard.index(),
                                    shard.locus()
                                )));
                            }
                        }
                    }
                });
            }
        });

        let failure = failure
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(err) = failure {
            return Err(err);
        }
        if has_failed.into_inner() {
            bail!("Coverage run was cancelled without a recorded error");
        }

        let (outputs, stats) = Worker::collapse(
            shards.len(),
            self.workers.iter_mut().map(|x| x.get_mut()),
        )?;
        let report = consolidate(&outputs)?;
        self.stats = stats;

        log::info!(
            "Coverage for {} finished: {} positions from {} shards in {:.3}s",
            locus,
            report.len(),
            shards.len(),
            launched_at.elapsed().as_secs_f64()
        );
        Ok(report)
    }
}
