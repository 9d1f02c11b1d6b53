use std::cmp::Ordering;
use std::thread::available_parallelism;

use eyre::Result;

// Positive values are taken as is (capped), 0 means a single thread, and negative values
// count backwards from the maximum: -1 is "all", -2 is "all but one", etc.
fn _normalize(requested: isize, max: isize) -> usize {
    match requested.cmp(&0) {
        Ordering::Less => (max + requested + 1).max(1) as usize,
        Ordering::Equal => 1,
        Ordering::Greater => requested.min(max) as usize,
    }
}

/// Number of threads to use given the requested value and the parallelism of the host.
pub fn available(requested: isize) -> Result<usize> {
    let max = available_parallelism()?.get() as isize;
    Ok(_normalize(requested, max))
}

/// Same as [`available`], but never more than `ceiling` threads (e.g. the number of tasks).
pub fn bounded(requested: isize, ceiling: usize) -> Result<usize> {
    Ok(available(requested)?.min(ceiling.max(1)))
}
