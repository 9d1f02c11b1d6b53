use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::read::{Cursor, Page};
use super::read_source::{ReadSource, SourceLocus};

/// Pagination state of a single locus.
///
/// `Init -> Fetching -> ... -> Done` on success, `-> Failed` as soon as a call fails.
/// Done and Failed are terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum State {
    Init,
    Fetching,
    Done,
    Failed(ApiError),
}

/// Outcome of a single [`Pager::advance`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Page(Page),
    Done,
    Failed(ApiError),
}

/// Serializable snapshot of a pager, enough to resume the walk in another process.
#[derive(
    Clone, Debug, PartialEq, Eq, Constructor, Dissolve, Getters, Serialize, Deserialize,
)]
pub struct Checkpoint {
    locus: SourceLocus,
    // Cursor of the next request. None either before the first request or after the last page.
    cursor: Option<Cursor>,
    // Number of pages consumed so far
    next_index_hint: usize,
}

/// Drives a [`ReadSource`] through all pages of a locus, one request per [`Pager::advance`] call.
#[derive(Clone, Debug, Getters)]
pub struct Pager {
    locus: SourceLocus,
    state: State,
    cursor: Option<Cursor>,
    pages: usize,
}

impl Pager {
    pub fn new(locus: SourceLocus) -> Self {
        Self {
            locus,
            state: State::Init,
            cursor: None,
            pages: 0,
        }
    }

    pub fn resume(checkpoint: Checkpoint) -> Self {
        let (locus, cursor, pages) = checkpoint.dissolve();
        let state = match (&cursor, pages) {
            (Some(_), _) => State::Fetching,
            (None, 0) => State::Init,
            (None, _) => State::Done,
        };
        Self {
            locus,
            state,
            cursor,
            pages,
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.locus.clone(), self.cursor.clone(), self.pages)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, State::Done | State::Failed(_))
    }

    /// Request the next page. Terminal pagers don't touch the source and repeat their outcome.
    pub fn advance<S: ReadSource + ?Sized>(&mut self, source: &mut S) -> Step {
        match &self.state {
            State::Done => return Step::Done,
            State::Failed(err) => return Step::Failed(err.clone()),
            State::Init | State::Fetching => {}
        }

        match source.fetch_page(&self.locus, self.cursor.as_ref()) {
            Ok(page) => {
                self.pages += 1;
                self.cursor = page.next_cursor().clone();
                self.state = match self.cursor {
                    Some(_) => State::Fetching,
                    None => State::Done,
                };
                log::debug!(
                    "Fetched page #{} for {} ({} reads, last: {})",
                    self.pages,
                    self.locus,
                    page.reads().len(),
                    page.is_last()
                );
                Step::Page(page)
            }
            Err(err) => {
                // The cursor is kept to allow resuming from the failed request
                log::warn!("Fetching page #{} for {} failed: {}", self.pages + 1, self.locus, err);
                self.state = State::Failed(err.clone());
                Step::Failed(err)
            }
        }
    }
}
