use dyn_clone::DynClone;
use impl_tools::autoimpl;

use crate::loc::Locus;

use super::error::ApiError;
use super::read::{Cursor, Page};

/// Locus type understood by read sources: a named sequence and a closed range of positions.
pub type SourceLocus = Locus<String, u64>;

/// Capability to fetch pages of aligned reads overlapping a locus.
///
/// A single call issues at most one upstream request and never retries. Implementations are
/// cloned for every worker thread, so a clone must be usable independently of the original.
#[autoimpl(for<T: trait + ?Sized> Box<T> where Box<T>: Clone)]
pub trait ReadSource: DynClone + Send + Sync {
    /// Fetch the page of reads overlapping `locus` that follows `cursor` (the first page if None).
    fn fetch_page(&mut self, locus: &SourceLocus, cursor: Option<&Cursor>)
        -> Result<Page, ApiError>;
}

dyn_clone::clone_trait_object!(ReadSource);
