use eyre::Result;
use rayon::{ThreadPool, ThreadPoolBuilder};
use readcov_core_rs::parallelism;
use thread_local::ThreadLocal;

use crate::engine::Engine;
use crate::sharder::MAX_SHARDS;

/// Number of shards used when nothing else is requested.
pub const DEFAULT_SHARDS: usize = 16;

pub struct EngineBuilder {
    thread_pool: Option<ThreadPool>,
    threads: Option<isize>,
    shards: usize,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            thread_pool: None,
            threads: None,
            shards: DEFAULT_SHARDS,
        }
    }
}

impl EngineBuilder {
    /// Run all shards inside the given pool. Takes precedence over [`EngineBuilder::set_threads`].
    pub fn set_thread_pool(mut self, pool: ThreadPool) -> Self {
        self.thread_pool = Some(pool);
        self
    }

    /// Create a dedicated pool: positive values are exact (capped by the host), 0 is a single
    /// thread and negative values count back from all available threads.
    pub fn set_threads(mut self, threads: isize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Requested number of shards, clamped to `[1, MAX_SHARDS]` at run time.
    pub fn set_shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    pub fn build(self) -> Result<Engine> {
        let pool = match (self.thread_pool, self.threads) {
            (Some(pool), _) => Some(pool),
            (None, Some(threads)) => {
                let threads = parallelism::bounded(threads, MAX_SHARDS)?;
                log::debug!("Creating a dedicated pool with {} threads", threads);
                Some(ThreadPoolBuilder::new().num_threads(threads).build()?)
            }
            // Global rayon pool
            (None, None) => None,
        };
        Ok(Engine::new(pool, self.shards, ThreadLocal::new(), Vec::new()))
    }
}
