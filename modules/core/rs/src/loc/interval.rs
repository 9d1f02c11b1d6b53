use std::fmt::{Debug, Display};
use std::ops::RangeInclusive;
use std::rc::Rc;
use std::sync::Arc;

use derive_getters::Dissolve;
use eyre::{eyre, Report, Result};
use impl_tools::autoimpl;
use ::num::One;
use serde::{Deserialize, Serialize};

use crate::num::PrimInt;

/// Interval is a closed genomic range [start, end].
/// It's not represented as a Rust-native RangeInclusive for a couple of reasons:
/// - Prohibit intervals with negative length (start > end). Single-base intervals (start == end) are fine.
/// - Implement custom traits (e.g. Dissolve, Serialize with validation) and methods (e.g. intersection).
#[derive(
    Serialize, Deserialize, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Dissolve,
)]
#[serde(try_from = "RawInterval<Idx>")]
pub struct Interval<Idx: PrimInt> {
    start: Idx,
    end: Idx,
}

#[derive(Deserialize)]
struct RawInterval<Idx> {
    start: Idx,
    end: Idx,
}

impl<Idx: PrimInt> TryFrom<RawInterval<Idx>> for Interval<Idx> {
    type Error = Report;

    fn try_from(raw: RawInterval<Idx>) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

/// Trait for types that can be generally viewed as closed genomic intervals [start, end].
#[autoimpl(for <T: trait + ?Sized> &T, Box<T>, Rc<T>, Arc<T>)]
#[allow(clippy::len_without_is_empty)]
pub trait IntervalOp {
    type Idx: PrimInt;

    /// First position covered by the interval-like object.
    fn start(&self) -> Self::Idx;

    /// Last position covered by the interval-like object (inclusive).
    fn end(&self) -> Self::Idx;

    /// Number of positions covered by the interval-like object. Never zero.
    fn len(&self) -> Self::Idx {
        self.end() - self.start() + <Self::Idx as One>::one()
    }

    /// Check if the interval-like object contains a given position.
    fn contains(&self, pos: Self::Idx) -> bool {
        self.start() <= pos && pos <= self.end()
    }

    /// Check if the interval-like object shares at least one position with another one.
    fn intersects(&self, other: &Self) -> bool {
        self.start() <= other.end() && other.start() <= self.end()
    }

    /// Turn the interval-like object into a basic closed genomic interval.
    fn as_interval(&self) -> Interval<Self::Idx> {
        Interval {
            start: self.start(),
            end: self.end(),
        }
    }
}

impl<T: PrimInt> IntervalOp for Interval<T> {
    type Idx = T;

    #[inline(always)]
    fn start(&self) -> Self::Idx {
        self.start
    }
    #[inline(always)]
    fn end(&self) -> Self::Idx {
        self.end
    }
}

impl<Idx: PrimInt> Interval<Idx> {
    pub fn new(start: Idx, end: Idx) -> Result<Self> {
        if start <= end {
            Ok(Self { start, end })
        } else {
            Err(eyre!("Invalid interval: start > end ({start:?} > {end:?})"))
        }
    }

    /// Interval that covers a single position.
    pub fn single(pos: Idx) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Interval that starts at `start` and covers `length` positions. None for zero-length requests.
    pub fn spanning(start: Idx, length: Idx) -> Option<Self> {
        if length.is_zero() {
            return None;
        }
        start
            .checked_add(&(length - Idx::one()))
            .map(|end| Self { start, end })
    }

    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }
}

impl<Idx: PrimInt> Default for Interval<Idx> {
    fn default() -> Self {
        Self::single(Idx::zero())
    }
}

impl<Idx: PrimInt + Display> Display for Interval<Idx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

impl<Idx: PrimInt> TryFrom<(Idx, Idx)> for Interval<Idx> {
    type Error = Report;

    fn try_from(value: (Idx, Idx)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1)
    }
}

impl<Idx: PrimInt> From<Interval<Idx>> for (Idx, Idx) {
    fn from(interval: Interval<Idx>) -> Self {
        (interval.start, interval.end)
    }
}

impl<Idx: PrimInt> TryFrom<RangeInclusive<Idx>> for Interval<Idx> {
    type Error = Report;

    fn try_from(value: RangeInclusive<Idx>) -> Result<Self, Self::Error> {
        let (start, end) = value.into_inner();
        Self::new(start, end)
    }
}

impl<Idx: PrimInt> From<Interval<Idx>> for RangeInclusive<Idx> {
    fn from(interval: Interval<Idx>) -> Self {
        interval.start..=interval.end
    }
}

impl<Idx: PrimInt> From<&Interval<Idx>> for RangeInclusive<Idx> {
    fn from(interval: &Interval<Idx>) -> Self {
        interval.start..=interval.end
    }
}

impl<Idx: PrimInt> PartialEq<(Idx, Idx)> for Interval<Idx> {
    fn eq(&self, other: &(Idx, Idx)) -> bool {
        self.start == other.0 && self.end == other.1
    }
}
