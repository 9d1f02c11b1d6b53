use std::fmt::{Debug, Display};
use std::hash::Hash;

use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::{Report, Result};
use serde::{Deserialize, Serialize};

use crate::num::PrimInt;

use super::interval::{Interval, IntervalOp};

/// Contig is an object that refers to an actual assembly contig (sequence name). Usually a string.
pub trait Contig:
    Hash + PartialEq + Eq + PartialOrd + Ord + Clone + Default + Debug + Display + Send + Sync
{
}

impl<T> Contig for T where
    T: Hash + PartialEq + Eq + PartialOrd + Ord + Clone + Default + Debug + Display + Send + Sync
{
}

/// A locus is a closed range of positions on a named sequence, e.g. `chr17:41196312-41277500`.
#[derive(
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    Hash,
    Default,
    Dissolve,
    Getters,
    Constructor,
    Serialize,
    Deserialize,
)]
pub struct Locus<Ctg: Contig, Idx: PrimInt> {
    contig: Ctg,
    interval: Interval<Idx>,
}

impl<Ctg: Contig, Idx: PrimInt> Locus<Ctg, Idx> {
    /// Same locus restricted to a sub-interval of the same contig.
    pub fn with_interval(&self, interval: Interval<Idx>) -> Self {
        Self {
            contig: self.contig.clone(),
            interval,
        }
    }
}

impl<Ctg: Contig, Idx: PrimInt> IntervalOp for Locus<Ctg, Idx> {
    type Idx = Idx;

    #[inline(always)]
    fn start(&self) -> Self::Idx {
        self.interval.start()
    }

    #[inline(always)]
    fn end(&self) -> Self::Idx {
        self.interval.end()
    }
}

impl<Ctg: Contig, Idx: PrimInt> TryFrom<(Ctg, Idx, Idx)> for Locus<Ctg, Idx> {
    type Error = Report;

    fn try_from((contig, start, end): (Ctg, Idx, Idx)) -> Result<Self, Self::Error> {
        Ok(Self {
            contig,
            interval: Interval::new(start, end)?,
        })
    }
}

impl<Ctg: Contig, Idx: PrimInt + Display> Display for Locus<Ctg, Idx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}",
            self.contig,
            self.interval.start(),
            self.interval.end()
        )
    }
}
