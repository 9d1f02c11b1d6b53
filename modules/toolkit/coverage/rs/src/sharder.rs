use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::Result;
use readcov_core_rs::loc::{Interval, IntervalOp};
use readcov_core_rs::source::SourceLocus;

/// Upper bound on the number of shards in a single run.
pub const MAX_SHARDS: usize = 256;

/// A contiguous piece of the analyzed locus, processed independently of the others.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Constructor, Dissolve, Getters)]
pub struct Shard {
    index: usize,
    locus: SourceLocus,
}

impl Shard {
    pub fn split(locus: &SourceLocus, requested: usize) -> Result<Vec<Shard>> {
        split(locus, requested)
    }
}

impl IntervalOp for Shard {
    type Idx = u64;

    fn start(&self) -> Self::Idx {
        self.locus.start()
    }

    fn end(&self) -> Self::Idx {
        self.locus.end()
    }
}

/// Partition the locus into at most `requested` ascending, contiguous, non-overlapping shards.
///
/// The request is clamped to `[1, MAX_SHARDS]`. All shards but the last one span
/// `len / requested` positions (at least one), the last one takes the rest. Loci shorter than the
/// request yield one single-position shard per position.
pub fn split(locus: &SourceLocus, requested: usize) -> Result<Vec<Shard>> {
    let effective = requested.clamp(1, MAX_SHARDS);
    if effective != requested {
        log::warn!(
            "Requested number of shards ({}) is outside of [1, {}], using {} instead",
            requested,
            MAX_SHARDS,
            effective
        );
    }

    // u128 because the length of [0, u64::MAX] doesn't fit u64
    let (start, end) = (locus.start() as u128, locus.end() as u128);
    let length = end - start + 1;
    let range = (length / effective as u128).max(1);
    let count = (effective as u128).min(length);

    let shards = (0..count)
        .map(|ind| -> Result<Shard> {
            let first = start + ind * range;
            let last = if ind + 1 == count {
                end
            } else {
                first + range - 1
            };
            let interval = Interval::new(first as u64, last as u64)?;
            Ok(Shard::new(ind as usize, locus.with_interval(interval)))
        })
        .collect::<Result<Vec<_>>>()?;

    if shards.len() < effective {
        log::warn!(
            "{} is too short for {} shards, using {} single-position shards",
            locus,
            effective,
            shards.len()
        );
    }
    Ok(shards)
}
