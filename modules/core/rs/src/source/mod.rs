//! Paginated read sources.
//!
//! A [`ReadSource`] answers one request at a time: "give me a page of reads overlapping this
//! locus, continuing from this cursor". Walking all pages of a locus is driven from the outside
//! by a [`Pager`], which owns the pagination state and never relies on errors to signal the end
//! of the stream.

pub use error::{ApiError, ApiErrorKind};
pub use pager::{Checkpoint, Pager, State, Step};
pub use read::{Cursor, Page, ReadAlignment};
pub use read_source::{ReadSource, SourceLocus};

mod error;
mod pager;
mod read;
mod read_source;
