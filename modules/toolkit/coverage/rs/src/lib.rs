pub use accumulator::{accumulate, CoverageAccumulator, CoverageVector};
pub use builder::{EngineBuilder, DEFAULT_SHARDS};
pub use consolidator::consolidate;
pub use engine::Engine;
pub use result::{ConsolidatedReport, Stats};
pub use shard_output::ShardOutput;
pub use sharder::{split, Shard, MAX_SHARDS};

mod accumulator;
mod builder;
pub mod consolidator;
mod engine;
mod result;
mod shard_output;
pub mod sharder;
mod worker;
